mod util;

use tinystl::fail::Error;
use tinystl::{AllocError, Vector};

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use self::util::{Bomb, Tracked};

#[test]
fn simple() {
    util::multiply(|| {
        let mut vec = Vector::new();

        for i in 0..0x1000 {
            util::acid(|| {
                vec.push_back(i);
            });
        }
        assert_eq!(vec.len(), 0x1000);

        for (i, &x) in vec.iter().enumerate() {
            assert_eq!(x, i);
        }

        while let Some(x) = vec.pop_back() {
            assert_eq!(x, vec.len());
        }
    });
}

#[test]
fn vec_vec() {
    util::multiply(|| {
        let mut outer: Vector<Vector<usize>> = Vector::new();

        for n in 0..200 {
            util::acid(|| {
                outer.push_back((0..n).collect());
            });
        }

        for (n, inner) in outer.iter().enumerate() {
            assert_eq!(inner.len(), n);
            assert!(inner.iter().cloned().eq(0..n));
        }
    });
}

#[test]
fn editing() {
    let mut vec: Vector<i32> = (0..10).collect();

    vec.insert(0, -1);
    vec.insert_n(5, 3, &100);
    vec.insert_iter(vec.len(), 20..23);
    assert_eq!(vec, [-1, 0, 1, 2, 3, 100, 100, 100, 4, 5, 6, 7, 8, 9, 20, 21, 22]);

    assert_eq!(vec.remove(0), -1);
    vec.remove_range(4..7);
    assert_eq!(vec, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 20, 21, 22]);

    vec.truncate(10);
    vec.resize(12, &0);
    assert_eq!(vec, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 0]);

    vec.assign(3, &7);
    assert_eq!(vec, [7, 7, 7]);

    vec.assign_iter(vec![1, 2]);
    let mut other = Vector::<_>::from_elem(4, &9);
    vec.swap(&mut other);
    assert_eq!(vec, [9, 9, 9, 9]);
    assert_eq!(other, [1, 2]);

    assert_eq!(vec.front(), Some(&9));
    *vec.back_mut().unwrap() = 0;
    assert_eq!(vec.as_slice(), &[9, 9, 9, 0]);
}

#[test]
fn insert_oob() {
    let result = panic::catch_unwind(|| {
        let mut vec: Vector<u8> = Vector::new();
        vec.insert(1, 0);
    });
    assert!(result.is_err());
}

#[test]
fn drops() {
    let live = Rc::new(Cell::new(0));

    {
        let mut vec = Vector::new();
        for i in 0..100 {
            vec.push_back(Tracked::new(i, &live));
        }
        assert_eq!(live.get(), 100);

        vec.remove_range(10..20);
        vec.truncate(50);
        assert_eq!(live.get(), 50);

        let copy = vec.clone();
        assert_eq!(live.get(), 100);
        assert!(copy == vec);

        let mut iter = copy.into_iter();
        iter.next();
        iter.next_back();
        assert_eq!(live.get(), 98);
    }

    assert_eq!(live.get(), 0);
}

#[test]
fn clone_rollback() {
    let live = Rc::new(Cell::new(0));
    let fuse = Rc::new(Cell::new(0));

    let vec: Vector<Bomb> = (0..10).map(|i| Bomb::new(i, &live, &fuse)).collect();
    assert_eq!(live.get(), 10);

    fuse.set(6);
    let result = panic::catch_unwind(AssertUnwindSafe(|| vec.clone()));
    assert!(result.is_err());
    // The six finished clones were dropped again.
    assert_eq!(live.get(), 10);

    fuse.set(2);
    let mut target: Vector<Bomb> = Vector::new();
    target.push_back(Bomb::new(-1, &live, &fuse));
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        target.insert_n(0, 5, &vec[0]);
    }));
    assert!(result.is_err());
    assert_eq!(target.len(), 1);
    assert_eq!(target[0].tracked.value, -1);
    assert_eq!(live.get(), 11);
}

#[test]
fn try_from_fn() {
    let vec: Vector<usize> = Vector::try_from_fn(5, |i| Ok::<_, ()>(i * i)).unwrap();
    assert_eq!(vec, [0, 1, 4, 9, 16]);

    let live = Rc::new(Cell::new(0));
    let result: Result<Vector<Tracked>, _> = Vector::try_from_fn(10, |i| {
        if i == 7 {
            Err("seven")
        } else {
            Ok(Tracked::new(i as i32, &live))
        }
    });
    assert_eq!(result.unwrap_err(), Error::Construct("seven"));
    assert_eq!(live.get(), 0);
}

#[test]
fn rationed() {
    let mut vec: Vector<u64, util::Rationed> = Vector::new_in(util::Rationed);

    util::ration(0);
    assert_eq!(vec.try_reserve(10), Err(AllocError));
    assert_eq!(vec.capacity(), 0);

    util::ration(1);
    vec.reserve(10);
    vec.extend(0..10);
    assert_eq!(vec.try_insert(3, 99), Err(AllocError));
    assert_eq!(vec.len(), 10);
    assert_eq!(vec[3], 3);

    util::unration();
}

#[test]
fn ordering() {
    let a: Vector<i32> = (0..5).collect();
    let b: Vector<i32> = (0..6).collect();
    let c: Vector<i32> = vec![0, 2].into_iter().collect();

    assert!(a < b);
    assert!(b < c);
    assert_eq!(a.clone().max(b.clone()), b);
    assert_eq!(format!("{:?}", c), "[0, 2]");
}
