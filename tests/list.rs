mod util;

use tinystl::functional::Greater;
use tinystl::{AllocError, List};

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use self::util::{Bomb, Tracked};

#[test]
fn simple() {
    util::multiply(|| {
        let mut list = List::new();

        for i in 0..1000 {
            util::acid(|| {
                list.push_back(i);
                list.push_front(-i);
            });
        }
        assert_eq!(list.len(), 2000);
        assert_eq!(list.front(), Some(&-999));
        assert_eq!(list.back(), Some(&999));

        while let (Some(a), Some(b)) = (list.pop_front(), list.pop_back()) {
            assert_eq!(a, -b);
        }
        assert!(list.is_empty());
    });
}

#[test]
fn cursor_editing() {
    let mut list: List<i32> = (0..10).collect();

    {
        let mut cursor = list.cursor_front_mut();
        while let Some(&mut x) = cursor.current() {
            if x % 2 == 0 {
                cursor.remove_current();
            } else {
                cursor.insert_after(x * 10);
                cursor.move_next();
                cursor.move_next();
            }
        }
        assert_eq!(cursor.index(), None);
        // On the sentinel, inserting after goes to the front.
        cursor.insert_after(-1);
        cursor.insert_before(100);
    }
    assert_eq!(list, [-1, 1, 10, 3, 30, 5, 50, 7, 70, 9, 90, 100]);

    let mut cursor = list.cursor_mut(3);
    assert_eq!(cursor.peek_prev(), Some(&mut 10));
    assert_eq!(cursor.peek_next(), Some(&mut 30));
    cursor.move_prev();
    assert_eq!(cursor.index(), Some(2));
}

#[test]
fn splicing() {
    let mut a: List<u8> = (0..5).collect();
    let mut b: List<u8> = (10..15).collect();

    a.splice_one(5, &mut b, 2);
    assert_eq!(a, [0, 1, 2, 3, 4, 12]);
    assert_eq!(b, [10, 11, 13, 14]);

    a.splice_range(0, &mut b, 1..3);
    assert_eq!(a, [11, 13, 0, 1, 2, 3, 4, 12]);
    assert_eq!(b.len(), 2);

    a.splice(4, &mut b);
    assert!(b.is_empty());
    assert_eq!(a.len(), 10);

    let tail = a.split_off(7);
    assert_eq!(tail.len(), 3);
    assert_eq!(a, [11, 13, 0, 1, 10, 14, 2]);

    let mut rest = tail;
    a.append(&mut rest);
    assert_eq!(a.len(), 10);
    assert!(rest.is_empty());

    {
        let mut cursor = a.cursor_mut(0);
        let mut extra: List<u8> = (20..22).collect();
        cursor.splice_after(&mut extra);
        assert_eq!(cursor.index(), Some(0));
        let mut extra: List<u8> = (30..32).collect();
        cursor.splice_before(&mut extra);
        assert_eq!(cursor.index(), Some(2));
    }
    assert_eq!(a, [30, 31, 11, 20, 21, 13, 0, 1, 10, 14, 2, 3, 4, 12]);
}

#[test]
fn ordering() {
    let mut list: List<u32> = (0..1000).map(|i| (i * 389) % 1000).collect();
    list.sort();
    assert!(list.iter().cloned().eq(0..1000));

    list.sort_by(Greater);
    assert!(list.iter().cloned().eq((0..1000).rev()));
    list.reverse();

    let mut odds: List<u32> = (0..2000).filter(|x| x % 2 == 1).collect();
    list.merge(&mut odds);
    assert!(odds.is_empty());
    assert_eq!(list.len(), 2000);
    let mut sorted = list.iter().cloned();
    let mut prev = sorted.next().unwrap();
    for x in sorted {
        assert!(prev <= x);
        prev = x;
    }

    // Stability: sort pairs by the first half only.
    let mut pairs: List<(u8, u16)> = (0..500u16).map(|i| ((i % 7) as u8, i)).collect();
    pairs.sort_by(|a: &(u8, u16), b: &(u8, u16)| a.0 < b.0);
    let mut iter = pairs.iter();
    let mut prev = *iter.next().unwrap();
    for &x in iter {
        assert!(prev.0 < x.0 || (prev.0 == x.0 && prev.1 < x.1));
        prev = x;
    }
}

#[test]
fn filtering() {
    let mut list: List<i32> = [1, 1, 2, 3, 3, 3, 1, 4, 4].iter().cloned().collect();

    list.unique();
    assert_eq!(list, [1, 2, 3, 1, 4]);

    list.remove_value(&1);
    assert_eq!(list, [2, 3, 4]);

    list.retain(|x| x % 2 == 0);
    assert_eq!(list, [2, 4]);

    list.resize(4, &9);
    assert_eq!(list, [2, 4, 9, 9]);
    list.truncate(1);
    list.assign_iter(5..8);
    assert_eq!(list, [5, 6, 7]);
    list.assign(2, &0);
    assert_eq!(list, [0, 0]);
}

#[test]
fn sort_panic() {
    let live = Rc::new(Cell::new(0));
    let mut list: List<Tracked> = (0..100).map(|i| Tracked::new((i * 37) % 100, &live)).collect();

    let calls = Cell::new(0);
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        list.sort_by(|a: &Tracked, b: &Tracked| {
            calls.set(calls.get() + 1);
            if calls.get() == 150 {
                panic!("Comparison failed.");
            }
            a.value < b.value
        });
    }));
    assert!(result.is_err());

    // Every node is still in the list.
    assert_eq!(list.len(), 100);
    assert_eq!(list.iter().count(), 100);
    let mut seen: Vec<i32> = list.iter().map(|t| t.value).collect();
    seen.sort();
    assert!(seen.into_iter().eq(0..100));

    drop(list);
    assert_eq!(live.get(), 0);
}

#[test]
fn clone_rollback() {
    let live = Rc::new(Cell::new(0));
    let fuse = Rc::new(Cell::new(0));

    let list: List<Bomb> = (0..20).map(|i| Bomb::new(i, &live, &fuse)).collect();

    fuse.set(10);
    let result = panic::catch_unwind(AssertUnwindSafe(|| list.clone()));
    assert!(result.is_err());
    assert_eq!(live.get(), 20);

    fuse.set(100);
    let copy = list.clone();
    assert_eq!(live.get(), 40);
    assert!(copy.iter().map(|b| b.tracked.value).eq(0..20));
}

#[test]
fn rationed() {
    // The sentinel takes the only allocation.
    util::ration(1);
    let mut list: List<u32, util::Rationed> = List::new_in(util::Rationed);

    assert_eq!(list.try_push_back(1), Err((1, AllocError)));
    assert!(list.is_empty());

    util::ration(1);
    assert!(list.try_push_front(2).is_ok());
    assert_eq!(list.cursor_front_mut().try_insert_after(3), Err((3, AllocError)));
    assert_eq!(list, [2]);

    util::unration();
}
