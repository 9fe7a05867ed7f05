//! Overlapping borrows of the node-based containers.
//!
//! Each test holds several shared borrows of the same elements at once, reads through all of
//! them, then mutates and reads again. Run these under `cargo miri test` as well.

use tinystl::{List, Map, Set, Slist};

#[test]
fn slist_head_edits() {
    let mut list: Slist<i32> = Slist::new();
    list.push_front(1);
    list.push_front(2);
    assert_eq!(list.len(), 2);

    {
        let mut cursor = list.before_begin_mut();
        cursor.insert_after(3);
        cursor.insert_after(4);
        assert_eq!(cursor.remove_next(), Some(4));
    }
    list.push_front(5);
    assert_eq!(list.pop_front(), Some(5));
    assert_eq!(list.pop_front(), Some(3));

    list.previous_mut(0).insert_after(6);
    list.resize(5, &0);
    assert_eq!(list, [6, 2, 1, 0, 0]);

    list.truncate(0);
    list.extend(7..9);
    assert_eq!(list, [7, 8]);
}

#[test]
fn slist_moved_between_edits() {
    let mut list: Slist<u32> = Slist::new();
    list.push_front(1);

    let mut moved = list;
    moved.push_front(0);
    let mut lists = vec![moved];
    lists[0].push_front(9);
    assert_eq!(lists[0].pop_front(), Some(9));
    assert_eq!(lists.pop().unwrap(), [0, 1]);
}

#[test]
fn slist_shared_reads() {
    let mut list: Slist<u32> = (0..4).collect();

    let a = list.front().unwrap();
    let b = list.front().unwrap();
    let mut first = list.iter();
    let second = list.iter();
    assert_eq!(first.next(), Some(a));
    assert!(second.eq(list.iter()));
    assert_eq!(*a + *b, 0);

    *list.front_mut().unwrap() = 10;
    assert_eq!(list.front(), Some(&10));
    assert_eq!(list.iter().sum::<u32>(), 16);
}

#[test]
fn list_shared_reads() {
    let mut list: List<u32> = (1..5).collect();

    let a = list.front().unwrap();
    let b = list.front().unwrap();
    let c = list.back().unwrap();
    let mut forward = list.iter();
    let mut backward = list.iter().rev();
    assert_eq!(forward.next(), Some(&1));
    assert_eq!(backward.next(), Some(&4));
    assert_eq!(list.cursor_front().current(), Some(a));
    assert_eq!(*a + *b + *c, 6);

    *list.back_mut().unwrap() += 1;
    list.push_front(0);
    assert_eq!(list, [0, 1, 2, 3, 5]);
    assert_eq!(list.front(), list.iter().next());
}

#[test]
fn set_shared_reads() {
    let mut set: Set<u32> = (0..64).collect();

    let a = set.first().unwrap();
    let b = set.first().unwrap();
    let c = set.last().unwrap();
    let d = set.find(&31).unwrap();
    let mut forward = set.iter();
    let mut backward = set.iter();
    assert_eq!(forward.next(), Some(a));
    assert_eq!(backward.next_back(), Some(c));
    assert_eq!(set.lower_bound(&31).get(), Some(d));
    assert_eq!(*a + *b + *c + *d, 94);

    set.insert(100);
    set.remove(&0);
    assert_eq!(set.first(), Some(&1));
    assert_eq!(set.last(), Some(&100));
    assert!(set.verify());
}

#[test]
fn map_shared_reads() {
    let mut map: Map<u32, String> = Map::new();
    for i in 0..16 {
        map.insert(i, i.to_string());
    }

    let x = map.get(&7).unwrap();
    let y = map.get(&7).unwrap();
    let (first, _) = map.first().unwrap();
    let seven = map.iter().find(|(k, _)| *k == 7).map(|(_, v)| v);
    assert_eq!(seven, Some(x));
    assert_eq!(format!("{}{}{}", x, y, first), "770");

    map.get_mut(&7).unwrap().push('!');
    assert_eq!(map.get(&7).map(String::as_str), Some("7!"));
    assert!(map.verify());
}
