//! Price-Ordered List - a lock-free sorted singly linked list.
//!
//! One list holds one side of one ticker's book, ordered by price (descending
//! for buys, ascending for sells) with ties broken by ascending sequence
//! number, i.e. price-time priority.
//!
//! All mutation is single-word CAS. Any conflict restarts the whole attempt
//! from a freshly read head rather than patching the affected link, because
//! the computed predecessor may itself have been retired mid-traversal.
//! Removal is two-phase: a tag bit on the victim's forward link retires it
//! logically (no insert can attach behind it afterwards), then the head is
//! swung past it. Retired nodes are reclaimed through `crossbeam_epoch`, so a
//! traversal that still holds a reference never dereferences freed memory.

use crossbeam_epoch::{self as epoch, Atomic, Guard, Owned, Shared};
use std::sync::atomic::Ordering::{AcqRel, Acquire, Relaxed, Release};

use crate::order::Order;

/// Tag bit on a node's `next` link marking the node as logically removed.
const RETIRED: usize = 1;

/// Sort direction for the price key. Sequence numbers always ascend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    /// Best price first for buys: highest price at the head
    PriceDescending,
    /// Best price first for sells: lowest price at the head
    PriceAscending,
}

pub(crate) struct Node {
    pub(crate) order: Order,
    pub(crate) next: Atomic<Node>,
}

/// Immutable point-in-time view of one resting order, for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderView {
    pub seq: u64,
    pub price: u64,
    pub remaining: u64,
}

/// Lock-free singly linked list sorted by (price, seq).
pub struct PriceOrderedList {
    head: Atomic<Node>,
    sort: SortOrder,
}

impl PriceOrderedList {
    pub fn new(sort: SortOrder) -> Self {
        Self {
            head: Atomic::null(),
            sort,
        }
    }

    /// `true` if `a` ranks strictly ahead of `b` in this list.
    #[inline]
    fn ranks_before(&self, a: &Order, b: &Order) -> bool {
        if a.price != b.price {
            match self.sort {
                SortOrder::PriceDescending => a.price > b.price,
                SortOrder::PriceAscending => a.price < b.price,
            }
        } else {
            a.seq < b.seq
        }
    }

    /// Publish `order` into the list exactly once, preserving sortedness.
    ///
    /// Lock-free: a CAS conflict abandons the attempt and restarts from a
    /// freshly read head, so each insertion is worst-case O(n) per attempt.
    pub(crate) fn insert(&self, order: Order) {
        let guard = epoch::pin();
        let mut new = Owned::new(Node {
            order,
            next: Atomic::null(),
        });
        loop {
            match self.try_insert(new, &guard) {
                Ok(()) => return,
                Err(node) => new = node,
            }
        }
    }

    /// One insertion attempt from a fresh head. Returns the node back on any
    /// conflict so the caller can retry without reallocating.
    fn try_insert(&self, new: Owned<Node>, guard: &Guard) -> Result<(), Owned<Node>> {
        let head = self.load_head(guard);

        // Head position: empty list, or the new node outranks the head.
        let outranks_head = match unsafe { head.as_ref() } {
            None => true,
            Some(h) => self.ranks_before(&new.order, &h.order),
        };
        if outranks_head {
            new.next.store(head, Relaxed);
            return match self.head.compare_exchange(head, new, Release, Relaxed, guard) {
                Ok(_) => Ok(()),
                Err(e) => Err(e.new),
            };
        }

        // Interior position: walk to the first successor the new node
        // outranks (or the end) and link into the predecessor's `next`.
        let mut pred = head;
        loop {
            let pred_ref = unsafe { pred.deref() };
            let succ = pred_ref.next.load(Acquire, guard);
            if succ.tag() == RETIRED {
                // Predecessor was retired under us.
                return Err(new);
            }
            let succ_ref = match unsafe { succ.as_ref() } {
                None => None,
                Some(s) => {
                    let after = s.next.load(Acquire, guard);
                    if after.tag() == RETIRED {
                        // Buried tombstone: unlink it before deciding. The
                        // CAS also fails if `pred` got retired meanwhile.
                        match pred_ref.next.compare_exchange(
                            succ,
                            after.with_tag(0),
                            AcqRel,
                            Relaxed,
                            guard,
                        ) {
                            Ok(_) => {
                                unsafe { guard.defer_destroy(succ) };
                                continue;
                            }
                            Err(_) => return Err(new),
                        }
                    }
                    Some(s)
                }
            };
            match succ_ref {
                Some(s) if !self.ranks_before(&new.order, &s.order) => pred = succ,
                _ => {
                    new.next.store(succ, Relaxed);
                    return match pred_ref.next.compare_exchange(succ, new, Release, Relaxed, guard)
                    {
                        Ok(_) => Ok(()),
                        Err(e) => Err(e.new),
                    };
                }
            }
        }
    }

    /// Load the head, unlinking any retired node that has surfaced there.
    fn load_head<'g>(&self, guard: &'g Guard) -> Shared<'g, Node> {
        loop {
            let head = self.head.load(Acquire, guard);
            let node = match unsafe { head.as_ref() } {
                None => return head,
                Some(n) => n,
            };
            let next = node.next.load(Acquire, guard);
            if next.tag() != RETIRED {
                return head;
            }
            if self
                .head
                .compare_exchange(head, next.with_tag(0), AcqRel, Relaxed, guard)
                .is_ok()
            {
                unsafe { guard.defer_destroy(head) };
            }
        }
    }

    /// Current front order, with the shared pointer needed for a later
    /// conditional removal. `None` if the list is empty.
    pub(crate) fn front<'g>(&self, guard: &'g Guard) -> Option<(Shared<'g, Node>, &'g Order)> {
        let head = self.load_head(guard);
        unsafe { head.as_ref() }.map(|n| (head, &n.order))
    }

    /// Retire `node`, unlinking it from the head position if it still holds
    /// it.
    ///
    /// Phase one tags the node's forward link so no concurrent insert can
    /// attach a successor behind it; phase two swings the head past it. If a
    /// front insert buried the node between the caller's read and phase two,
    /// the tombstone stays linked and is purged when it next surfaces at the
    /// head (or by an insert walking over it).
    ///
    /// Returns `false` if another thread already retired the node; the caller
    /// must re-read state and recompute either way.
    pub(crate) fn remove_head_if(&self, node: Shared<'_, Node>, guard: &Guard) -> bool {
        let node_ref = unsafe { node.deref() };
        let mut succ = node_ref.next.load(Acquire, guard);
        loop {
            if succ.tag() == RETIRED {
                return false;
            }
            match node_ref
                .next
                .compare_exchange(succ, succ.with_tag(RETIRED), AcqRel, Acquire, guard)
            {
                Ok(_) => break,
                // An insert linked a new successor behind us; re-read it.
                Err(e) => succ = e.current,
            }
        }
        if self
            .head
            .compare_exchange(node, succ.with_tag(0), AcqRel, Relaxed, guard)
            .is_ok()
        {
            unsafe { guard.defer_destroy(node) };
        }
        true
    }

    /// Price of the best (front) live order, if any.
    pub fn best_price(&self) -> Option<u64> {
        let guard = epoch::pin();
        self.front(&guard).map(|(_, order)| order.price)
    }

    /// Point-in-time view of all live orders in list order.
    ///
    /// Diagnostic surface for tests and reporting; retired nodes that are
    /// still physically linked are skipped.
    pub fn snapshot(&self) -> Vec<OrderView> {
        let guard = epoch::pin();
        let mut out = Vec::new();
        let mut curr = self.head.load(Acquire, &guard);
        while let Some(node) = unsafe { curr.as_ref() } {
            let next = node.next.load(Acquire, &guard);
            if next.tag() != RETIRED {
                out.push(OrderView {
                    seq: node.order.seq,
                    price: node.order.price,
                    remaining: node.order.remaining(),
                });
            }
            curr = next.with_tag(0);
        }
        out
    }

    /// Number of live orders reachable from the head.
    pub fn len(&self) -> usize {
        let guard = epoch::pin();
        let mut count = 0;
        let mut curr = self.head.load(Acquire, &guard);
        while let Some(node) = unsafe { curr.as_ref() } {
            let next = node.next.load(Acquire, &guard);
            if next.tag() != RETIRED {
                count += 1;
            }
            curr = next.with_tag(0);
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        let guard = epoch::pin();
        self.front(&guard).is_none()
    }
}

impl Drop for PriceOrderedList {
    fn drop(&mut self) {
        // `&mut self` proves no other thread can touch the list; walk the
        // chain and free every node, retired or not.
        unsafe {
            let guard = epoch::unprotected();
            let mut curr = self.head.load(Relaxed, guard);
            while !curr.is_null() {
                let next = curr.deref().next.load(Relaxed, guard);
                drop(curr.into_owned());
                curr = next.with_tag(0);
            }
        }
    }
}

impl std::fmt::Debug for PriceOrderedList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceOrderedList")
            .field("sort", &self.sort)
            .field("len", &self.len())
            .finish()
    }
}
