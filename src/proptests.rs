use super::*;

use crate::node::{NodeId, MAX_EDGES};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};

fn validate_tree<V>(t: &Trie<V>) {
    let mut stack: Vec<NodeId> = vec![t.root];
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut data_count = 0usize;

    while let Some(id) = stack.pop() {
        assert!(seen.insert(id), "node reachable twice: {id:?}");
        let node = t.arena.node(id);
        if node.data.is_some() {
            data_count += 1;
        }

        let edges = node.edges();
        assert!(node.capacity() <= MAX_EDGES, "edge capacity over 256");
        assert!(edges.len() <= node.capacity());
        for pair in edges.windows(2) {
            assert!(
                pair[0].byte < pair[1].byte,
                "edges must be strictly ascending"
            );
        }
        for edge in edges {
            assert_ne!(edge.child, NodeId::ROOT, "root linked as a child");
            stack.push(edge.child);
        }
    }

    assert_eq!(seen.len(), t.node_count(), "every live node must be reachable");
    assert_eq!(data_count, t.len(), "data-carrying nodes must match Trie::len");
}

fn visit_all(t: &Trie<u64>, prefix: &[u8]) -> Vec<(Vec<u8>, u64)> {
    let mut out = Vec::new();
    t.visit(prefix, |k, v| {
        out.push((k.to_vec(), *v));
        ControlFlow::Continue(())
    })
    .unwrap();
    out
}

fn cursor_all(t: &Trie<u64>, prefix: &[u8]) -> Vec<(Vec<u8>, u64)> {
    let mut out = Vec::new();
    let mut c = t.cursor(prefix);
    while !c.is_done() {
        out.push((c.key().unwrap().to_vec(), *c.data().unwrap()));
        c.advance();
    }
    assert!(c.error().is_none());
    out
}

#[derive(Clone, Debug)]
enum Op {
    Insert(Vec<u8>, u64),
    Remove(Vec<u8>),
    Get(Vec<u8>),
    Prune,
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // A small alphabet keeps keys sharing prefixes; 0x00 and 0xff are in it
    // to cover both ends of the byte order.
    let byte = prop::sample::select(vec![0x00u8, b'a', b'b', b'c', b'd', b'e', 0xff]);
    prop::collection::vec(byte, 0..=12)
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        50 => (key.clone(), any::<u64>()).prop_map(|(k, v)| Op::Insert(k, v)),
        25 => key.clone().prop_map(Op::Remove),
        24 => key.clone().prop_map(Op::Get),
        1 => Just(Op::Prune),
    ];
    prop::collection::vec(op, 0..=1000)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy()) {
        let mut t: Trie<u64> = Trie::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let old_t = t.insert(&key, value).unwrap();
                    let old_m = m.insert(key, value);
                    prop_assert_eq!(old_t, old_m);
                }
                Op::Remove(key) => {
                    let old_t = t.remove(&key);
                    let old_m = m.remove(key.as_slice());
                    prop_assert_eq!(old_t, old_m);
                }
                Op::Get(key) => {
                    let got_t = t.get(&key).copied();
                    let got_m = m.get(key.as_slice()).copied();
                    prop_assert_eq!(got_t, got_m);
                }
                Op::Prune => {
                    t.prune().unwrap();
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        validate_tree(&t);
        let got = visit_all(&t, b"");
        let expected: Vec<(Vec<u8>, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(got, expected);
        prop_assert_eq!(t.count(b"").unwrap(), m.len());
    }

    #[test]
    fn prop_visit_matches_cursor(
        keys in prop::collection::vec(key_strategy(), 0..200),
        prefix in key_strategy(),
    ) {
        let mut t: Trie<u64> = Trie::new();
        for (i, key) in keys.iter().enumerate() {
            t.insert(key, i as u64).unwrap();
        }

        let visited = visit_all(&t, &prefix);
        let pulled = cursor_all(&t, &prefix);
        prop_assert_eq!(&visited, &pulled);

        for pair in visited.windows(2) {
            prop_assert!(pair[0].0 < pair[1].0, "keys must strictly increase");
        }
        for (key, _) in &visited {
            prop_assert!(key.starts_with(&prefix));
        }

        let expected = keys
            .iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter(|k| k.starts_with(&prefix))
            .count();
        prop_assert_eq!(t.count(&prefix).unwrap(), expected);
    }

    #[test]
    fn prop_prune_keeps_live_keys(
        keys in prop::collection::vec(key_strategy(), 1..200),
        removals in prop::collection::vec(any::<prop::sample::Index>(), 0..100),
    ) {
        let mut t: Trie<u64> = Trie::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
        for (i, key) in keys.iter().enumerate() {
            t.insert(key, i as u64).unwrap();
            m.insert(key.clone(), i as u64);
        }
        for index in removals {
            let key = index.get(&keys);
            t.remove(key);
            m.remove(key);
        }

        let size_before = t.size().unwrap();
        let nodes_before = t.node_count();
        let reclaimed = t.prune().unwrap();
        prop_assert_eq!(t.node_count(), nodes_before - reclaimed);
        prop_assert!(t.size().unwrap() <= size_before);
        if reclaimed > 0 {
            prop_assert!(t.size().unwrap() < size_before);
        }

        validate_tree(&t);
        for (key, value) in &m {
            prop_assert_eq!(t.get(key), Some(value));
        }

        // After pruning, every leaf holds data.
        let mut stack = vec![t.root];
        while let Some(id) = stack.pop() {
            let node = t.arena.node(id);
            if id != t.root {
                prop_assert!(!node.is_dead(), "dead node survived prune");
            }
            stack.extend(node.edges().iter().map(|e| e.child));
        }
        prop_assert_eq!(t.prune().unwrap(), 0);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

fn small_set() -> Vec<Vec<u8>> {
    vec![
        b"a".to_vec(),
        b"b".to_vec(),
        b"".to_vec(),
        b"aa".to_vec(),
        b"ab".to_vec(),
        b"ba".to_vec(),
    ]
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys = small_set();

    for_each_permutation(&keys, |perm| {
        let mut t: Trie<u64> = Trie::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for (i, k) in perm.into_iter().enumerate() {
            let v = i as u64;
            assert_eq!(t.insert(&k, v).unwrap(), m.insert(k, v));
        }

        validate_tree(&t);
        // Shape is independent of insertion order: root, a, b, aa, ab, ba.
        assert_eq!(t.node_count(), 6);
        let expected: Vec<(Vec<u8>, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        assert_eq!(visit_all(&t, b""), expected);
        assert_eq!(cursor_all(&t, b""), expected);
    });
}

#[test]
fn exhaustive_remove_then_prune_small_set() {
    let keys = small_set();

    let mut base_tree: Trie<u64> = Trie::new();
    for (i, k) in keys.iter().enumerate() {
        base_tree.insert(k, i as u64).unwrap();
    }

    for_each_permutation(&keys, |perm| {
        let mut t = base_tree.clone();
        let mut remaining: BTreeMap<Vec<u8>, u64> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i as u64))
            .collect();

        for k in perm {
            assert_eq!(t.remove(&k), remaining.remove(&k));
            t.prune().unwrap();
            validate_tree(&t);
            for (key, value) in &remaining {
                assert_eq!(t.get(key), Some(value));
            }
        }
        assert!(t.is_empty());
        assert_eq!(t.node_count(), 1);
    });
}
