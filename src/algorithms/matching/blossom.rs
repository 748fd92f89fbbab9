#[cfg(test)]
#[path = "../../../tests/unit/algorithms/matching/blossom_test.rs"]
mod blossom_test;

use super::{greater, near_zero, EdgeIndex, Graph, MatchingError, Vertex};
use crate::algorithms::structures::IndexedMinHeap;
use std::collections::VecDeque;

/// A label of a vertex in the alternating forest.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Label {
    Unlabeled,
    Odd,
    Even,
}

/// Solves maximum cardinality and minimum cost perfect matching problems.
///
/// Original vertices and contracted blossoms share one flat index space
/// `[0, 2n)`: indices below `n` name original vertices, indices from `n`
/// name pseudo-vertices which are recycled through a free list. The engine
/// borrows its graph and owns all per-solve state, which is reinitialized
/// at the start of every solve call.
pub struct Matching<'a> {
    graph: &'a Graph,
    num_vertices: usize,
    num_edges: usize,

    /// Outermost active blossom containing the vertex, or the vertex itself.
    outer: Vec<usize>,
    /// Original vertices contained inside the blossom.
    deep: Vec<Vec<usize>>,
    /// Immediately nested blossoms forming the odd circuit of the blossom.
    shallow: Vec<VecDeque<usize>>,
    /// The vertex where the blossom attached to the alternating forest.
    tip: Vec<usize>,
    /// Whether the pseudo-vertex names a live blossom.
    active: Vec<bool>,

    label: Vec<Label>,
    /// Predecessor in the alternating forest.
    forest: Vec<Option<usize>>,
    /// Root of the tree in the alternating forest.
    root: Vec<usize>,

    /// A blossom frozen by dual constraints behaves as a single vertex.
    blocked: Vec<bool>,
    /// Dual multipliers of original vertices and blossoms.
    dual: Vec<f64>,
    /// Reduced costs of the edges; a positive slack forbids the edge.
    slack: Vec<f64>,
    mate: Vec<Option<usize>>,

    /// Unused pseudo-vertex indices.
    free: Vec<usize>,
    queue: VecDeque<usize>,
    visited: Vec<bool>,
    perfect: bool,
}

impl<'a> Matching<'a> {
    /// Creates a matching engine over the given graph.
    pub fn new(graph: &'a Graph) -> Self {
        let n = graph.num_vertices();
        let m = graph.num_edges();

        Self {
            graph,
            num_vertices: n,
            num_edges: m,
            outer: vec![0; 2 * n],
            deep: vec![Vec::new(); 2 * n],
            shallow: vec![VecDeque::new(); 2 * n],
            tip: vec![0; 2 * n],
            active: vec![false; 2 * n],
            label: vec![Label::Unlabeled; 2 * n],
            forest: vec![None; 2 * n],
            root: vec![0; 2 * n],
            blocked: vec![false; 2 * n],
            dual: vec![0.; 2 * n],
            slack: vec![0.; m],
            mate: vec![None; 2 * n],
            free: Vec::with_capacity(n),
            queue: VecDeque::new(),
            visited: vec![false; 2 * n],
            perfect: false,
        }
    }

    /// Solves the maximum cardinality matching problem ignoring edge costs.
    /// Returns the indices of the matched edges.
    pub fn solve_maximum_matching(&mut self) -> Vec<EdgeIndex> {
        self.clear();
        self.grow();
        self.retrieve_matching()
    }

    /// Solves the minimum cost perfect matching problem for the given edge
    /// costs, one cost per edge index. Returns the indices of the matched
    /// edges together with the total matching cost.
    pub fn solve_minimum_cost_perfect_matching(
        &mut self,
        cost: &[f64],
    ) -> Result<(Vec<EdgeIndex>, f64), MatchingError> {
        assert_eq!(cost.len(), self.num_edges, "expect one cost per edge");

        self.solve_maximum_matching();
        if !self.perfect {
            return Err(MatchingError::NoPerfectMatching);
        }

        self.clear();
        self.slack.copy_from_slice(cost);
        let shift = self.positive_costs();

        // the primal-dual loop is safeguarded against a poorly chosen epsilon
        let n = self.num_vertices;
        let iteration_cap = n * n * n + 16;
        let mut iterations = 0;

        self.perfect = false;
        while !self.perfect {
            if iterations > iteration_cap {
                return Err(MatchingError::NumericalFailure);
            }
            iterations += 1;

            self.heuristic();
            self.grow();
            self.update_dual_costs();
            self.reset();
        }

        let matching = self.retrieve_matching();
        let objective = matching.iter().map(|&edge| cost[edge]).sum::<f64>();

        let dual_objective = (0..2 * n)
            .filter(|&index| index < n || self.blocked[index])
            .map(|index| self.dual[index])
            .sum::<f64>();

        // complementary slackness: the primal objective over the shifted costs
        // must agree with the dual objective
        let shifted_objective = objective - shift * (n as f64 / 2.);
        if !near_zero((shifted_objective - dual_objective) / shifted_objective.abs().max(1.)) {
            return Err(MatchingError::NumericalFailure);
        }

        Ok((matching, objective))
    }

    /// Grows an alternating forest rooted at the unmatched outermost vertices
    /// in a BFS fashion, exploring tight edges only.
    fn grow(&mut self) {
        self.reset();

        while let Some(front) = self.queue.pop_front() {
            let w = self.outer[front];

            // w might be a blossom, explore connections from every vertex inside it
            'deep: for deep_index in 0..self.deep[w].len() {
                let u = self.deep[w][deep_index];

                let graph = self.graph;
                for &v in graph.adjacent(u) {
                    if self.is_edge_blocked(u, v) {
                        continue;
                    }
                    if self.label[self.outer[v]] == Label::Odd {
                        continue;
                    }

                    if self.label[self.outer[v]] != Label::Even {
                        // v is unlabeled, extend the tree through the matched edge of v
                        let outer_v = self.outer[v];
                        let vm = self.mate[outer_v].expect("an unlabeled vertex is always matched");

                        self.forest[outer_v] = Some(u);
                        self.label[outer_v] = Label::Odd;
                        self.root[outer_v] = self.root[self.outer[u]];

                        let outer_vm = self.outer[vm];
                        self.forest[outer_vm] = Some(v);
                        self.label[outer_vm] = Label::Even;
                        self.root[outer_vm] = self.root[self.outer[u]];

                        if !self.visited[outer_vm] {
                            self.queue.push_back(vm);
                            self.visited[outer_vm] = true;
                        }
                    } else if self.root[self.outer[v]] != self.root[self.outer[u]] {
                        // two even vertices on different trees give an augmenting path
                        self.augment(u, v);
                        self.reset();
                        break 'deep;
                    } else if self.outer[u] != self.outer[v] {
                        // two even vertices on the same tree close an odd circuit
                        let blossom = self.contract_blossom(u, v);
                        self.queue.push_front(blossom);
                        self.visited[blossom] = true;
                        break 'deep;
                    }
                }
            }
        }

        self.perfect = (0..self.num_vertices).all(|vertex| self.mate[self.outer[vertex]].is_some());
    }

    /// Expands the blossom `u`, restoring the matching through its odd
    /// circuit. A blocked blossom is only expanded when `expand_blocked`
    /// is set.
    fn expand(&mut self, u: usize, expand_blocked: bool) {
        let v = self.outer[self.mate[u].expect("expansion requires a matched blossom")];

        // find the regular edge of minimum index connecting u and its mate;
        // the minimum index grants that two blossoms expanded symmetrically
        // agree on the crossing edge
        let mut crossing: Option<(EdgeIndex, Vertex, Vertex)> = None;
        for &du in &self.deep[u] {
            for &dv in &self.deep[v] {
                if self.is_adjacent(du, dv) {
                    let edge = self.graph.edge_index(du, dv).expect("adjacent vertices share an edge");
                    if crossing.is_none_or(|(best, _, _)| edge < best) {
                        crossing = Some((edge, du, dv));
                    }
                }
            }
        }

        let (_, p, q) = crossing.expect("mated blossoms are joined by a tight edge");
        self.mate[u] = Some(q);
        self.mate[v] = Some(p);

        if u < self.num_vertices || (self.blocked[u] && !expand_blocked) {
            return;
        }

        // rotate the odd circuit so that the sub-blossom holding p comes first
        for _ in 0..self.shallow[u].len() {
            let front = *self.shallow[u].front().expect("a blossom circuit is never empty");
            if self.deep[front].contains(&p) {
                break;
            }
            self.shallow[u].rotate_left(1);
        }

        let circuit = self.shallow[u].iter().copied().collect::<Vec<_>>();

        // the new tip takes over the mate of u, the rest of the circuit
        // re-mates in alternate pairs
        self.mate[circuit[0]] = self.mate[u];
        let mut index = 1;
        while index + 1 < circuit.len() {
            self.mate[circuit[index]] = Some(circuit[index + 1]);
            self.mate[circuit[index + 1]] = Some(circuit[index]);
            index += 2;
        }

        for &member in circuit.iter() {
            self.outer[member] = member;
            for &vertex in self.deep[member].iter() {
                self.outer[vertex] = member;
            }
        }
        self.active[u] = false;
        self.free.push(u);

        for &member in circuit.iter() {
            self.expand(member, expand_blocked);
        }
    }

    /// Augments the matching along the path from `u` to `v` through their
    /// respective roots in the alternating forest.
    fn augment(&mut self, u: Vertex, v: Vertex) {
        let mut p = self.outer[u];
        let mut q = self.outer[v];
        let second_branch = q;

        let mut predecessor = self.forest[p];
        self.mate[p] = Some(q);
        self.mate[q] = Some(p);
        self.expand(p, false);
        self.expand(q, false);

        while let Some(parent) = predecessor {
            q = self.outer[parent];
            p = self.outer[self.forest[q].expect("an odd vertex always has a predecessor")];
            predecessor = self.forest[p];

            self.mate[p] = Some(q);
            self.mate[q] = Some(p);
            self.expand(p, false);
            self.expand(q, false);
        }

        p = second_branch;
        predecessor = self.forest[p];
        while let Some(parent) = predecessor {
            q = self.outer[parent];
            p = self.outer[self.forest[q].expect("an odd vertex always has a predecessor")];
            predecessor = self.forest[p];

            self.mate[p] = Some(q);
            self.mate[q] = Some(p);
            self.expand(p, false);
            self.expand(q, false);
        }
    }

    /// Drops the alternating forest, destroys every unblocked blossom and
    /// requeues every unmatched outermost vertex as a new forest root.
    fn reset(&mut self) {
        for index in 0..2 * self.num_vertices {
            self.forest[index] = None;
            self.root[index] = index;

            if index >= self.num_vertices && self.active[index] && self.outer[index] == index {
                self.destroy_blossom(index);
            }
        }

        self.visited.iter_mut().for_each(|visited| *visited = false);
        self.queue.clear();
        for vertex in 0..self.num_vertices {
            if self.mate[self.outer[vertex]].is_none() {
                self.label[self.outer[vertex]] = Label::Even;
                if !self.visited[self.outer[vertex]] {
                    self.queue.push_back(vertex);
                    self.visited[self.outer[vertex]] = true;
                }
            } else {
                self.label[self.outer[vertex]] = Label::Unlabeled;
            }
        }
    }

    /// Contracts the odd circuit closed by the edge `(u, v)` into a fresh
    /// pseudo-vertex. The tip is the first common vertex on the paths from
    /// `u` and `v` to their root.
    fn contract_blossom(&mut self, u: Vertex, v: Vertex) -> usize {
        let t = self.free.pop().expect("the arena always holds a free pseudo-vertex");

        let mut is_in_path = vec![false; 2 * self.num_vertices];
        let mut current = Some(u);
        while let Some(vertex) = current {
            is_in_path[self.outer[vertex]] = true;
            current = self.forest[self.outer[vertex]];
        }

        let mut tip = self.outer[v];
        while !is_in_path[tip] {
            tip = self.outer[self.forest[tip].expect("paths to the root always meet")];
        }
        self.tip[t] = tip;

        // record the odd circuit: the u-side is walked up to the tip in
        // reverse, the v-side follows in forest order
        let mut circuit = VecDeque::new();
        let mut current = self.outer[u];
        circuit.push_front(current);
        while current != self.tip[t] {
            current = self.outer[self.forest[current].expect("the tip lies on the path to the root")];
            circuit.push_front(current);
        }

        self.shallow[t].clear();
        self.deep[t].clear();
        for &member in circuit.iter() {
            self.shallow[t].push_back(member);
        }

        let mut current = self.outer[v];
        while current != self.tip[t] {
            self.shallow[t].push_back(current);
            current = self.outer[self.forest[current].expect("the tip lies on the path to the root")];
        }

        let mut deep = Vec::new();
        for shallow_index in 0..self.shallow[t].len() {
            let member = self.shallow[t][shallow_index];
            self.outer[member] = t;
            for &vertex in self.deep[member].iter() {
                self.outer[vertex] = t;
            }
            deep.extend(self.deep[member].iter().copied());
        }
        self.deep[t] = deep;

        self.forest[t] = self.forest[self.tip[t]];
        self.label[t] = Label::Even;
        self.root[t] = self.root[self.tip[t]];
        self.active[t] = true;
        self.outer[t] = t;
        self.mate[t] = self.mate[self.tip[t]];

        t
    }

    /// Performs one dual update step: raises even duals, lowers odd duals and
    /// adjusts edge slacks, then blocks and unblocks blossoms accordingly.
    fn update_dual_costs(&mut self) {
        let n = self.num_vertices;

        let (mut e1, mut e2, mut e3) = (0., 0., 0.);
        let (mut init_e1, mut init_e2, mut init_e3) = (false, false, false);

        for edge in 0..self.num_edges {
            let (u, v) = self.graph.edge(edge);
            let (label_u, label_v) = (self.label[self.outer[u]], self.label[self.outer[v]]);

            if (label_u == Label::Even && label_v == Label::Unlabeled)
                || (label_v == Label::Even && label_u == Label::Unlabeled)
            {
                if !init_e1 || greater(e1, self.slack[edge]) {
                    e1 = self.slack[edge];
                    init_e1 = true;
                }
            } else if self.outer[u] != self.outer[v] && label_u == Label::Even && label_v == Label::Even {
                if !init_e2 || greater(e2, self.slack[edge]) {
                    e2 = self.slack[edge];
                    init_e2 = true;
                }
            }
        }

        for index in n..2 * n {
            if self.active[index]
                && index == self.outer[index]
                && self.label[index] == Label::Odd
                && (!init_e3 || greater(e3, self.dual[index]))
            {
                e3 = self.dual[index];
                init_e3 = true;
            }
        }

        let mut e = if init_e1 {
            e1
        } else if init_e2 {
            e2
        } else if init_e3 {
            e3
        } else {
            0.
        };
        if init_e2 && greater(e, e2 / 2.) {
            e = e2 / 2.;
        }
        if init_e3 && greater(e, e3) {
            e = e3;
        }

        for index in 0..2 * n {
            if index != self.outer[index] {
                continue;
            }

            if self.active[index] && self.label[index] == Label::Even {
                self.dual[index] += e;
            } else if self.active[index] && self.label[index] == Label::Odd {
                self.dual[index] -= e;
            }
        }

        for edge in 0..self.num_edges {
            let (u, v) = self.graph.edge(edge);
            if self.outer[u] == self.outer[v] {
                continue;
            }

            let (label_u, label_v) = (self.label[self.outer[u]], self.label[self.outer[v]]);
            match (label_u, label_v) {
                (Label::Even, Label::Even) => self.slack[edge] -= 2. * e,
                (Label::Odd, Label::Odd) => self.slack[edge] += 2. * e,
                (Label::Even, Label::Unlabeled) | (Label::Unlabeled, Label::Even) => self.slack[edge] -= e,
                (Label::Odd, Label::Unlabeled) | (Label::Unlabeled, Label::Odd) => self.slack[edge] += e,
                _ => {}
            }
        }

        for index in n..2 * n {
            if greater(self.dual[index], 0.) {
                self.blocked[index] = true;
            } else if self.active[index] && self.blocked[index] {
                // the blossom is becoming unblocked
                if self.mate[index].is_none() {
                    self.destroy_blossom(index);
                } else {
                    self.blocked[index] = false;
                    self.expand(index, false);
                }
            }
        }
    }

    /// Reinitializes all matching state: tears every blossom down, clears
    /// mates and duals and zeroes the slacks.
    fn clear(&mut self) {
        let n = self.num_vertices;

        self.free.clear();
        self.free.extend(n..2 * n);

        for index in 0..2 * n {
            self.outer[index] = index;
            self.deep[index].clear();
            if index < n {
                self.deep[index].push(index);
            }
            self.shallow[index].clear();
            self.active[index] = index < n;

            self.label[index] = Label::Unlabeled;
            self.forest[index] = None;
            self.root[index] = index;

            self.blocked[index] = false;
            self.dual[index] = 0.;
            self.mate[index] = None;
            self.tip[index] = index;
        }
        self.slack.iter_mut().for_each(|slack| *slack = 0.);
    }

    /// Destroys a blossom recursively, leaving blocked blossoms with a
    /// positive dual untouched.
    fn destroy_blossom(&mut self, t: usize) {
        if t < self.num_vertices || (self.blocked[t] && greater(self.dual[t], 0.)) {
            return;
        }

        for shallow_index in 0..self.shallow[t].len() {
            let member = self.shallow[t][shallow_index];
            self.outer[member] = member;
            for &vertex in self.deep[member].iter() {
                self.outer[vertex] = member;
            }

            self.destroy_blossom(member);
        }

        self.active[t] = false;
        self.blocked[t] = false;
        self.free.push(t);
        self.mate[t] = None;
    }

    /// Warm-starts the matching over tight unblocked edges: vertices are
    /// visited in non-decreasing degree and matched to the unmatched
    /// neighbour of minimum degree.
    fn heuristic(&mut self) {
        let n = self.num_vertices;
        let mut degree = vec![0i64; n];

        for edge in 0..self.num_edges {
            if greater(self.slack[edge], 0.) {
                continue;
            }

            let (u, v) = self.graph.edge(edge);
            degree[u] += 1;
            degree[v] += 1;
        }

        let mut heap = IndexedMinHeap::new(n);
        for vertex in 0..n {
            heap.insert(degree[vertex], vertex);
        }

        while let Some(u) = heap.delete_min() {
            if self.mate[self.outer[u]].is_none() {
                let mut min: Option<Vertex> = None;

                let graph = self.graph;
                for &v in graph.adjacent(u) {
                    if self.is_edge_blocked(u, v)
                        || self.outer[u] == self.outer[v]
                        || self.mate[self.outer[v]].is_some()
                    {
                        continue;
                    }

                    if min.is_none_or(|min| degree[v] < degree[min]) {
                        min = Some(v);
                    }
                }
                if let Some(min) = min {
                    self.mate[self.outer[u]] = Some(min);
                    self.mate[self.outer[min]] = Some(u);
                }
            }
        }
    }

    /// Shifts the slacks so that all edges have non-negative reduced costs.
    /// Returns the applied shift (zero or the most negative cost).
    fn positive_costs(&mut self) -> f64 {
        let mut min_edge = 0.;
        for edge in 0..self.num_edges {
            if greater(min_edge - self.slack[edge], 0.) {
                min_edge = self.slack[edge];
            }
        }

        for edge in 0..self.num_edges {
            self.slack[edge] -= min_edge;
        }

        min_edge
    }

    /// Expands every remaining mated blossom down to original vertices and
    /// collects the matched edge indices.
    fn retrieve_matching(&mut self) -> Vec<EdgeIndex> {
        for index in 0..2 * self.num_vertices {
            if self.active[index] && self.mate[index].is_some() && self.outer[index] == index {
                self.expand(index, true);
            }
        }

        (0..self.num_edges)
            .filter(|&edge| {
                let (u, v) = self.graph.edge(edge);
                self.mate[u] == Some(v)
            })
            .collect()
    }

    /// An edge might be blocked due to the dual costs.
    fn is_edge_blocked(&self, u: Vertex, v: Vertex) -> bool {
        let edge = self.graph.edge_index(u, v).expect("adjacent vertices share an edge");
        greater(self.slack[edge], 0.)
    }

    /// Returns true if u and v are adjacent and their edge is tight.
    fn is_adjacent(&self, u: Vertex, v: Vertex) -> bool {
        self.graph.is_adjacent(u, v) && !self.is_edge_blocked(u, v)
    }
}
