//! Test automation.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use tinystl::allocator::{Alloc, PoolAlloc};
use tinystl::block::Block;
use tinystl::ptr::Pointer;
use tinystl::sys::{Malloc, Source};
use tinystl::{AllocError, List, Vector};

/// Wrap a block in acid tests.
///
/// This performs a number of temporary allocations through the pool to try to detect
/// inconsistency.
///
/// The basic idea is that if the pool is broken, it might hand out the same memory twice, or
/// corrupt a block when allocating. Thus, we allocate some blocks of several size classes and fill
/// them. This way we might be able to detect memory corruption through asserting memory
/// consistency after the closure is completed.
pub fn acid<F: FnOnce()>(func: F) {
    let mut vec: Vector<&str> = ["something", "yep", "yup"].iter().cloned().collect();
    let mut list: List<u64> = (0..5).collect();
    let mut boxes: Vector<Vector<u8>> = (1..6).map(|n| Vector::from_elem(n * 7, &(n as u8))).collect();

    vec.extend(["lol", "lulz"].iter().cloned());
    vec.extend(["we", "are"].iter().cloned());

    func();

    vec.push_back("heyaya");
    list.push_back(55);
    boxes.push_back(Vector::<_>::from_elem(3, &0xAA));

    assert_eq!(vec, ["something", "yep", "yup", "lol", "lulz", "we", "are", "heyaya"]);
    assert_eq!(list, [0, 1, 2, 3, 4, 55]);
    for (n, bytes) in boxes.iter().take(5).enumerate() {
        assert_eq!(bytes.len(), (n + 1) * 7);
        assert!(bytes.iter().all(|&b| b == (n + 1) as u8));
    }
    assert_eq!(boxes[5], [0xAA; 3]);
}

/// Run a closure on several threads at the same time, each within `acid`.
///
/// Every thread has its own pool, so this checks that they stay apart.
pub fn multiply<F: Fn() + Sync + Send>(func: F) {
    std::thread::scope(|scope| {
        for _ in 0..3 {
            scope.spawn(|| acid(|| func()));
        }
    });
}

/// A value which keeps a count of its live instances.
#[derive(Debug)]
pub struct Tracked {
    pub value: i32,
    live: Rc<Cell<usize>>,
}

impl Tracked {
    pub fn new(value: i32, live: &Rc<Cell<usize>>) -> Tracked {
        live.set(live.get() + 1);

        Tracked {
            value,
            live: live.clone(),
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Tracked {
        Tracked::new(self.value, &self.live)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Tracked) -> bool {
        self.value == other.value
    }
}

/// A value whose clone panics once a shared fuse burns out.
#[derive(Debug)]
pub struct Bomb {
    pub tracked: Tracked,
    fuse: Rc<Cell<usize>>,
}

impl Bomb {
    pub fn new(value: i32, live: &Rc<Cell<usize>>, fuse: &Rc<Cell<usize>>) -> Bomb {
        Bomb {
            tracked: Tracked::new(value, live),
            fuse: fuse.clone(),
        }
    }
}

impl Clone for Bomb {
    fn clone(&self) -> Bomb {
        if self.fuse.get() == 0 {
            panic!("Bomb went off.");
        }
        self.fuse.set(self.fuse.get() - 1);

        Bomb {
            tracked: self.tracked.clone(),
            fuse: self.fuse.clone(),
        }
    }
}

/// A source which refuses everything after `budget` acquisitions.
pub struct Limited {
    pub budget: usize,
    pub acquired: usize,
}

impl Limited {
    pub fn new(budget: usize) -> Limited {
        Limited { budget, acquired: 0 }
    }
}

impl Source for Limited {
    fn acquire(&mut self, size: usize) -> Option<Block> {
        if self.budget == 0 {
            return None;
        }
        self.budget -= 1;
        self.acquired += 1;

        Malloc.acquire(size)
    }

    unsafe fn release(&mut self, block: Block) {
        Malloc.release(block)
    }
}

thread_local! {
    static FUEL: Cell<usize> = Cell::new(usize::MAX);
}

/// Let the next `n` allocations through `Rationed` on this thread succeed, and fail the rest.
pub fn ration(n: usize) {
    FUEL.with(|fuel| fuel.set(n));
}

/// Lift the ration of this thread.
pub fn unration() {
    ration(usize::MAX);
}

/// The pool, but with a per-thread ration of allocations.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rationed;

impl Alloc for Rationed {
    fn allocate(&self, bytes: usize) -> Result<Pointer<u8>, AllocError> {
        let left = FUEL.with(|fuel| fuel.get());
        if left == 0 {
            return Err(AllocError);
        }
        FUEL.with(|fuel| fuel.set(left - 1));

        PoolAlloc.allocate(bytes)
    }

    unsafe fn deallocate(&self, ptr: Pointer<u8>, bytes: usize) {
        PoolAlloc.deallocate(ptr, bytes)
    }
}
