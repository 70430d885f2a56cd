//! Non-layered tidy tree layout for nodes of varying size.
//!
//! Linear-time algorithm from van der Ploeg, "Drawing Non-layered Tidy Trees
//! in Linear Time" (2014). Every node is a `width` x `height` box; a child
//! starts where its parent's box ends along the depth axis, so rows are not
//! aligned when sizes differ. Siblings are packed as tightly as their
//! subtrees' contours allow.
//!
//! Output coordinates: `x` is the centre of a node along the sibling axis
//! (the root ends up at 0) and `y` is its top along the depth axis.

#[derive(Debug, Clone, Default)]
pub struct FlexNode {
    pub width: f32,
    pub height: f32,
    pub children: Vec<usize>,
    pub x: f32,
    pub y: f32,
    prelim: f32,
    modifier: f32,
    shift: f32,
    change: f32,
    thread_left: Option<usize>,
    thread_right: Option<usize>,
    extreme_left: usize,
    extreme_right: usize,
    /// Modifier sums at the extreme nodes.
    msel: f32,
    mser: f32,
}

#[derive(Debug, Clone, Default)]
pub struct FlexTree {
    nodes: Vec<FlexNode>,
}

impl FlexTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub fn add_node(&mut self, width: f32, height: f32) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(FlexNode {
            width,
            height,
            extreme_left: idx,
            extreme_right: idx,
            ..FlexNode::default()
        });
        idx
    }

    pub fn add_child(&mut self, parent: usize, child: usize) {
        self.nodes[parent].children.push(child);
    }

    pub fn node(&self, idx: usize) -> &FlexNode {
        &self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Positions every node reachable from `root`. `spacing(a, b)` is the
    /// extra gap required between two contour nodes `a` (left) and `b`
    /// (right) on top of their widths.
    pub fn layout<F>(&mut self, root: usize, spacing: F)
    where
        F: Fn(usize, usize) -> f32,
    {
        if root >= self.nodes.len() {
            return;
        }
        // Every pass walks this list, forwards for top-down work and
        // backwards where children must be finished before their parent.
        let order = self.pre_order(root);
        self.assign_depth_positions(&order);
        for &t in order.iter().rev() {
            self.first_walk(t, &spacing);
        }
        self.second_walk(&order);
        let origin = self.nodes[root].x + self.nodes[root].width / 2.0;
        for &t in &order {
            let node = &mut self.nodes[t];
            node.x = node.x + node.width / 2.0 - origin;
        }
    }

    fn pre_order(&self, root: usize) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![root];
        while let Some(t) = stack.pop() {
            order.push(t);
            stack.extend(self.nodes[t].children.iter().rev().copied());
        }
        order
    }

    fn assign_depth_positions(&mut self, order: &[usize]) {
        self.nodes[order[0]].y = 0.0;
        for &t in order {
            let child_y = self.nodes[t].y + self.nodes[t].height;
            for i in 0..self.nodes[t].children.len() {
                let child = self.nodes[t].children[i];
                self.nodes[child].y = child_y;
            }
        }
    }

    fn bottom(&self, t: usize) -> f32 {
        self.nodes[t].y + self.nodes[t].height
    }

    /// Places `t` relative to its children. Every child subtree must already
    /// have been walked.
    fn first_walk<F>(&mut self, t: usize, spacing: &F)
    where
        F: Fn(usize, usize) -> f32,
    {
        let count = self.nodes[t].children.len();
        if count == 0 {
            self.set_extremes(t);
            return;
        }
        let first = self.nodes[t].children[0];
        let mut lowest = LowestY::default();
        lowest.update(self.bottom(self.nodes[first].extreme_left), 0);
        for i in 1..count {
            let child = self.nodes[t].children[i];
            let min_y = self.bottom(self.nodes[child].extreme_right);
            self.separate(t, i, &lowest, spacing);
            lowest.update(min_y, i);
        }
        self.position_root(t);
        self.set_extremes(t);
    }

    fn set_extremes(&mut self, t: usize) {
        let children = &self.nodes[t].children;
        if children.is_empty() {
            let node = &mut self.nodes[t];
            node.extreme_left = t;
            node.extreme_right = t;
            node.msel = 0.0;
            node.mser = 0.0;
        } else {
            let first = children[0];
            let last = children[children.len() - 1];
            let (el, msel) = (self.nodes[first].extreme_left, self.nodes[first].msel);
            let (er, mser) = (self.nodes[last].extreme_right, self.nodes[last].mser);
            let node = &mut self.nodes[t];
            node.extreme_left = el;
            node.msel = msel;
            node.extreme_right = er;
            node.mser = mser;
        }
    }

    fn separate<F>(&mut self, t: usize, i: usize, lowest: &LowestY, spacing: &F)
    where
        F: Fn(usize, usize) -> f32,
    {
        let left_sibling = self.nodes[t].children[i - 1];
        let current = self.nodes[t].children[i];
        // Right contour of the left siblings, left contour of the current subtree.
        let mut sr = Some(left_sibling);
        let mut mssr = self.nodes[left_sibling].modifier;
        let mut cl = Some(current);
        let mut mscl = self.nodes[current].modifier;
        let mut cursor = lowest.head();

        while let (Some(r), Some(l)) = (sr, cl) {
            if self.bottom(r) > lowest.low_y(cursor) {
                cursor = lowest.next(cursor);
            }
            let dist = (mssr + self.nodes[r].prelim + self.nodes[r].width + spacing(r, l))
                - (mscl + self.nodes[l].prelim);
            if dist > 0.0 {
                mscl += dist;
                self.move_subtree(t, i, lowest.index(cursor), dist);
            }
            let sy = self.bottom(r);
            let cy = self.bottom(l);
            if sy <= cy {
                sr = self.next_right_contour(r);
                if let Some(next) = sr {
                    mssr += self.nodes[next].modifier;
                }
            }
            if sy >= cy {
                cl = self.next_left_contour(l);
                if let Some(next) = cl {
                    mscl += self.nodes[next].modifier;
                }
            }
        }

        match (sr, cl) {
            (None, Some(l)) => self.set_left_thread(t, i, l, mscl),
            (Some(r), None) => self.set_right_thread(t, i, r, mssr),
            _ => {}
        }
    }

    fn move_subtree(&mut self, t: usize, i: usize, si: usize, dist: f32) {
        let child = self.nodes[t].children[i];
        let node = &mut self.nodes[child];
        node.modifier += dist;
        node.msel += dist;
        node.mser += dist;
        self.distribute_extra(t, i, si, dist);
    }

    fn distribute_extra(&mut self, t: usize, i: usize, si: usize, dist: f32) {
        if si + 1 == i {
            return;
        }
        let nr = (i - si) as f32;
        let after_si = self.nodes[t].children[si + 1];
        let current = self.nodes[t].children[i];
        self.nodes[after_si].shift += dist / nr;
        self.nodes[current].shift -= dist / nr;
        self.nodes[current].change -= dist - dist / nr;
    }

    fn next_left_contour(&self, t: usize) -> Option<usize> {
        let node = &self.nodes[t];
        match node.children.first() {
            Some(&first) => Some(first),
            None => node.thread_left,
        }
    }

    fn next_right_contour(&self, t: usize) -> Option<usize> {
        let node = &self.nodes[t];
        match node.children.last() {
            Some(&last) => Some(last),
            None => node.thread_right,
        }
    }

    fn set_left_thread(&mut self, t: usize, i: usize, cl: usize, modsum_cl: f32) {
        let first = self.nodes[t].children[0];
        let current = self.nodes[t].children[i];
        let li = self.nodes[first].extreme_left;
        let diff = (modsum_cl - self.nodes[cl].modifier) - self.nodes[first].msel;
        let leaf = &mut self.nodes[li];
        leaf.thread_left = Some(cl);
        leaf.modifier += diff;
        leaf.prelim -= diff;
        self.nodes[first].extreme_left = self.nodes[current].extreme_left;
        self.nodes[first].msel = self.nodes[current].msel;
    }

    fn set_right_thread(&mut self, t: usize, i: usize, sr: usize, modsum_sr: f32) {
        let previous = self.nodes[t].children[i - 1];
        let current = self.nodes[t].children[i];
        let ri = self.nodes[current].extreme_right;
        let diff = (modsum_sr - self.nodes[sr].modifier) - self.nodes[current].mser;
        let leaf = &mut self.nodes[ri];
        leaf.thread_right = Some(sr);
        leaf.modifier += diff;
        leaf.prelim -= diff;
        self.nodes[current].extreme_right = self.nodes[previous].extreme_right;
        self.nodes[current].mser = self.nodes[previous].mser;
    }

    fn position_root(&mut self, t: usize) {
        let children = &self.nodes[t].children;
        let first = &self.nodes[children[0]];
        let last = &self.nodes[children[children.len() - 1]];
        let span = first.prelim + first.modifier + last.modifier + last.prelim + last.width;
        self.nodes[t].prelim = span / 2.0 - self.nodes[t].width / 2.0;
    }

    fn second_walk(&mut self, order: &[usize]) {
        // Modifier sum of each node's ancestors, filled in as parents are visited.
        let mut parent_sums = vec![0.0; self.nodes.len()];
        for &t in order {
            let modsum = parent_sums[t] + self.nodes[t].modifier;
            self.nodes[t].x = self.nodes[t].prelim + modsum;
            self.add_child_spacing(t);
            for i in 0..self.nodes[t].children.len() {
                parent_sums[self.nodes[t].children[i]] = modsum;
            }
        }
    }

    fn add_child_spacing(&mut self, t: usize) {
        let mut d = 0.0;
        let mut modsum_delta = 0.0;
        for i in 0..self.nodes[t].children.len() {
            let child = self.nodes[t].children[i];
            let node = &mut self.nodes[child];
            d += node.shift;
            modsum_delta += d + node.change;
            node.modifier += modsum_delta;
        }
    }
}

/// Stack of the lowest y coordinates seen among the right contours of the
/// siblings placed so far, with the sibling index that owns each.
#[derive(Default)]
struct LowestY {
    entries: Vec<(f32, usize)>,
}

impl LowestY {
    fn update(&mut self, min_y: f32, index: usize) {
        while let Some(&(low_y, _)) = self.entries.last() {
            if min_y >= low_y {
                self.entries.pop();
            } else {
                break;
            }
        }
        self.entries.push((min_y, index));
    }

    fn head(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    fn next(&self, cursor: usize) -> usize {
        cursor.saturating_sub(1)
    }

    fn low_y(&self, cursor: usize) -> f32 {
        self.entries.get(cursor).map(|e| e.0).unwrap_or(f32::INFINITY)
    }

    fn index(&self, cursor: usize) -> usize {
        self.entries.get(cursor).map(|e| e.1).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlaps(tree: &FlexTree, a: usize, b: usize) -> bool {
        let (na, nb) = (tree.node(a), tree.node(b));
        let x_overlap = (na.x - nb.x).abs() < (na.width + nb.width) / 2.0 - 1e-3;
        let y_overlap = na.y < nb.y + nb.height - 1e-3 && nb.y < na.y + na.height - 1e-3;
        x_overlap && y_overlap
    }

    #[test]
    fn two_children_are_centred_under_root() {
        let mut tree = FlexTree::new();
        let a = tree.add_node(100.0, 80.0);
        let b = tree.add_node(100.0, 80.0);
        let c = tree.add_node(100.0, 80.0);
        tree.add_child(a, b);
        tree.add_child(a, c);
        tree.layout(a, |_, _| 0.0);
        assert_eq!(tree.node(a).x, 0.0);
        assert_eq!(tree.node(b).x, -50.0);
        assert_eq!(tree.node(c).x, 50.0);
        assert_eq!(tree.node(b).y, 80.0);
        assert_eq!(tree.node(c).y, 80.0);
    }

    #[test]
    fn spacing_hook_widens_gaps() {
        let mut tree = FlexTree::new();
        let a = tree.add_node(10.0, 10.0);
        let b = tree.add_node(10.0, 10.0);
        let c = tree.add_node(10.0, 10.0);
        tree.add_child(a, b);
        tree.add_child(a, c);
        tree.layout(a, |_, _| 6.0);
        assert_eq!(tree.node(c).x - tree.node(b).x, 16.0);
    }

    #[test]
    fn variable_sizes_never_overlap() {
        // root -> [p(wide, deep subtree), q, r(tall)]
        let mut tree = FlexTree::new();
        let root = tree.add_node(40.0, 20.0);
        let p = tree.add_node(120.0, 30.0);
        let q = tree.add_node(20.0, 10.0);
        let r = tree.add_node(30.0, 90.0);
        tree.add_child(root, p);
        tree.add_child(root, q);
        tree.add_child(root, r);
        let mut leaves = Vec::new();
        for size in [(50.0, 40.0), (70.0, 20.0), (25.0, 60.0)] {
            let leaf = tree.add_node(size.0, size.1);
            tree.add_child(p, leaf);
            leaves.push(leaf);
        }
        let deep = tree.add_node(200.0, 15.0);
        tree.add_child(leaves[1], deep);
        let under_q = tree.add_node(60.0, 60.0);
        tree.add_child(q, under_q);
        tree.layout(root, |_, _| 0.0);

        let n = tree.len();
        for a in 0..n {
            for b in (a + 1)..n {
                assert!(!overlaps(&tree, a, b), "{a} overlaps {b}");
            }
        }
        // Children sit directly below their parent's box.
        assert_eq!(tree.node(p).y, 20.0);
        assert_eq!(tree.node(deep).y, tree.node(leaves[1]).y + 20.0);
    }

    #[test]
    fn single_node_is_at_origin() {
        let mut tree = FlexTree::new();
        let a = tree.add_node(30.0, 30.0);
        tree.layout(a, |_, _| 0.0);
        assert_eq!((tree.node(a).x, tree.node(a).y), (0.0, 0.0));
    }

    #[test]
    fn parent_is_centred_over_outer_children() {
        let mut tree = FlexTree::new();
        let root = tree.add_node(10.0, 10.0);
        let kids: Vec<usize> = (0..5).map(|_| tree.add_node(10.0, 10.0)).collect();
        for kid in &kids {
            tree.add_child(root, *kid);
        }
        tree.layout(root, |_, _| 0.0);
        let first = tree.node(kids[0]).x;
        let last = tree.node(kids[4]).x;
        assert_eq!((first + last) / 2.0, 0.0);
        assert_eq!(last - first, 40.0);
    }

    #[test]
    fn deep_chain_lays_out_in_a_straight_line() {
        const DEPTH: usize = 50_000;
        let mut tree = FlexTree::with_capacity(DEPTH + 1);
        let root = tree.add_node(10.0, 2.0);
        let mut parent = root;
        for _ in 0..DEPTH {
            let child = tree.add_node(10.0, 2.0);
            tree.add_child(parent, child);
            parent = child;
        }
        tree.layout(root, |_, _| 5.0);
        assert_eq!(tree.node(parent).y, 2.0 * DEPTH as f32);
        assert!((0..tree.len()).all(|t| tree.node(t).x == 0.0));
    }
}
