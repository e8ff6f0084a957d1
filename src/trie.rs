//! Arena-backed prefix tree with inflection-tolerant lookup.
//!
//! Nodes live in one `Vec`; edges are `NodeId` indices, so stems can be shared
//! (`insert_prefix` + `insert_from_node`) without any aliasing gymnastics.
//! Words are case-folded on the way in and on the way out.
//!
//! `lookup` is deliberately heuristic: beyond exact matches it accepts a
//! handful of English inflections of stored words. The rules can over- and
//! under-match; they trade precision for not needing a stemmer. Any malformed
//! input (stray apostrophes, stems shorter than a rule expects) yields `false`.

use std::collections::HashMap;

/// Handle to a node inside a [`Trie`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Clone, Debug, Default)]
struct Node {
    children: HashMap<char, NodeId>,
    /// A stored word ends here.
    terminal: bool,
}

/// Case-insensitive prefix tree.
#[derive(Clone, Debug)]
pub struct Trie {
    nodes: Vec<Node>,
}

impl Default for Trie {
    fn default() -> Trie {
        Trie::new()
    }
}

impl Trie {
    pub fn new() -> Trie {
        Trie {
            nodes: vec![Node::default()],
        }
    }

    fn root() -> NodeId {
        NodeId(0)
    }

    fn child(&self, node: NodeId, ch: char) -> Option<NodeId> {
        self.nodes[node.0].children.get(&ch).copied()
    }

    fn child_or_insert(&mut self, node: NodeId, ch: char) -> NodeId {
        if let Some(id) = self.child(node, ch) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::default());
        self.nodes[node.0].children.insert(ch, id);
        id
    }

    fn fold(ch: char) -> char {
        ch.to_lowercase().next().unwrap_or(ch)
    }

    fn extend_path(&mut self, mut node: NodeId, text: &str) -> NodeId {
        for ch in text.chars() {
            node = self.child_or_insert(node, Self::fold(ch));
        }
        node
    }

    /// Stores `word` as a complete entry.
    pub fn insert(&mut self, word: &str) {
        let end = self.extend_path(Self::root(), word);
        self.nodes[end.0].terminal = true;
    }

    /// Lays down `stem` without marking it complete, returning the node at its
    /// end for suffix grafting via [`insert_from_node`](Self::insert_from_node).
    pub fn insert_prefix(&mut self, stem: &str) -> NodeId {
        self.extend_path(Self::root(), stem)
    }

    /// Grafts `suffix` onto `node` and marks the result complete. An empty
    /// suffix marks `node` itself complete.
    pub fn insert_from_node(&mut self, suffix: &str, node: NodeId) {
        let end = self.extend_path(node, suffix);
        self.nodes[end.0].terminal = true;
    }

    /// True when `prefix` matches a path from the root, complete or not.
    pub fn is_wordstart(&self, prefix: &str) -> bool {
        let mut node = Self::root();
        for ch in prefix.chars() {
            match self.child(node, Self::fold(ch)) {
                Some(next) => node = next,
                None => return false,
            }
        }
        true
    }

    /// Longest matched prefix of `word` (case-folded) and the node it ends at.
    pub fn find_part(&self, word: &str) -> (String, NodeId) {
        let mut node = Self::root();
        let mut matched = String::new();
        for ch in word.chars() {
            let folded = Self::fold(ch);
            match self.child(node, folded) {
                Some(next) => {
                    node = next;
                    matched.push(folded);
                }
                None => break,
            }
        }
        (matched, node)
    }

    /// Walks `word` from the root, recording one node per matched character.
    fn walk(&self, chars: &[char]) -> Vec<NodeId> {
        let mut node = Self::root();
        let mut path = Vec::with_capacity(chars.len());
        for &ch in chars {
            match self.child(node, Self::fold(ch)) {
                Some(next) => {
                    node = next;
                    path.push(next);
                }
                None => break,
            }
        }
        path
    }

    /// True when walking `suffix` from `node` lands on a terminal node.
    fn is_ending(&self, node: NodeId, suffix: &str) -> bool {
        let mut cur = node;
        for ch in suffix.chars() {
            match self.child(cur, Self::fold(ch)) {
                Some(next) => cur = next,
                None => return false,
            }
        }
        self.nodes[cur.0].terminal
    }

    /// Indexes `path` from its end: offset 1 is the last matched node.
    fn from_end(path: &[NodeId], offset: usize) -> Option<NodeId> {
        if offset == 0 || offset > path.len() {
            return None;
        }
        Some(path[path.len() - offset])
    }

    /// Membership test with inflection heuristics.
    pub fn lookup(&self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        let path = self.walk(&chars);
        let matched = path.len();
        let so_far: String = chars[..matched].iter().map(|&c| Self::fold(c)).collect();

        // Exact match.
        if matched == chars.len() {
            if let Some(last) = path.last() {
                if self.nodes[last.0].terminal {
                    return true;
                }
            }
        }

        let w: String = chars.iter().collect();

        // "-ies"/"-iest" against a "y" stem: berries -> berry.
        if w.ends_with("iest") || w.ends_with("ies") {
            // Back up over however much of "ies" the walk consumed.
            let mut tail = "ies";
            let mut offset = 4;
            while !tail.is_empty() {
                if so_far.ends_with(tail) {
                    break;
                }
                tail = &tail[..tail.len() - 1];
                offset -= 1;
            }
            if let Some(node) = Self::from_end(&path, offset) {
                if self.is_ending(node, "y") {
                    return true;
                }
            }
        }

        // Bare plural: the whole stem must have matched, terminal or not.
        if w.ends_with('s') && matched + 1 == chars.len() && so_far == w[..w.len() - 1] {
            return true;
        }

        // "-ed" word against an "-ing" entry: baked -> baking.
        if w.ends_with("ed") {
            let offset = if so_far.ends_with('e') { 2 } else { 1 };
            if let Some(node) = Self::from_end(&path, offset) {
                if self.is_ending(node, "ing") {
                    return true;
                }
            }
        }

        // "-ing" word against an "-ed" entry: baking -> baked.
        if w.ends_with("ing") {
            let mut tail = "in";
            let mut offset = 3;
            while !tail.is_empty() {
                if so_far.ends_with(tail) {
                    break;
                }
                tail = &tail[..tail.len() - 1];
                offset -= 1;
            }
            if let Some(node) = Self::from_end(&path, offset) {
                if self.is_ending(node, "ed") {
                    return true;
                }
            }
        }

        // Trailing possessive apostrophe: dogs' -> dogs.
        if w.ends_with('\'') || w.ends_with('’') {
            if chars.len() == 1 {
                return true;
            }
            if let Some(node) = Self::from_end(&path, 1) {
                if self.is_ending(node, "") {
                    return true;
                }
            }
        }

        // Interior apostrophe: strip it and an elided "n" (don't -> do).
        if let Some(pos) = chars.iter().position(|&c| c == '\'' || c == '’') {
            if pos > 0 && pos < chars.len() - 1 {
                let mut stem: String = chars[..pos].iter().map(|&c| Self::fold(c)).collect();
                if stem.ends_with('n') {
                    stem.pop();
                }
                if !stem.is_empty() && so_far.starts_with(&stem) {
                    let stem_len = stem.chars().count();
                    if let Some(node) = Self::from_end(&path, matched + 1 - stem_len) {
                        if self.nodes[node.0].terminal {
                            return true;
                        }
                    }
                }
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::Trie;

    fn sample() -> Trie {
        let mut t = Trie::new();
        for w in ["berry", "dog", "bake", "baking", "walked", "do", "can"] {
            t.insert(w);
        }
        t
    }

    #[test]
    fn exact_and_prefix_matching() {
        let t = sample();
        assert!(t.lookup("dog"));
        assert!(t.lookup("Berry"));
        assert!(!t.lookup("do g"));
        assert!(!t.lookup("berr"));
        assert!(t.is_wordstart("berr"));
        assert!(t.is_wordstart("BAK"));
        assert!(!t.is_wordstart("xy"));
        assert!(t.is_wordstart(""));
    }

    #[test]
    fn shared_stems_via_prefix_nodes() {
        let mut t = Trie::new();
        let stem = t.insert_prefix("jan");
        t.insert_from_node("uary", stem);
        t.insert_from_node(".", stem);
        t.insert_from_node("", stem);
        assert!(t.lookup("january"));
        assert!(t.lookup("jan"));
        assert!(t.lookup("jan."));
        assert!(t.is_wordstart("janu"));
        assert!(!t.lookup("janua"));
    }

    #[test]
    fn plural_heuristics() {
        let t = sample();
        assert!(t.lookup("dogs"));
        assert!(t.lookup("berries"));
        assert!(t.lookup("berriest"));
        assert!(!t.lookup("dogss"));
        assert!(!t.lookup("cats"));
    }

    #[test]
    fn ed_ing_swaps() {
        let t = sample();
        // "baked" rides the stored "bake"/"baking" pair.
        assert!(t.lookup("baked"));
        // "walking" rides the stored "walked".
        assert!(t.lookup("walking"));
        assert!(!t.lookup("talked"));
    }

    #[test]
    fn apostrophes() {
        let t = sample();
        assert!(t.lookup("dogs'"));
        // "don't" strips the apostrophe tail and the elided "n", leaving "do".
        assert!(t.lookup("don't"));
        // "can't" strips down to "ca", which is not stored.
        assert!(!t.lookup("can't"));
        assert!(!t.lookup("won't"));
        // Malformed placements fall through to false.
        assert!(!t.lookup("'dog"));
        assert!(!t.lookup("x''"));
    }

    #[test]
    fn find_part_returns_longest_prefix() {
        let t = sample();
        let (part, node) = t.find_part("bakery");
        assert_eq!(part, "bake");
        assert!(t.is_ending(node, ""));
        let (none, _) = t.find_part("zzz");
        assert_eq!(none, "");
    }

    #[test]
    fn empty_word_is_absent() {
        let t = sample();
        assert!(!t.lookup(""));
    }
}
