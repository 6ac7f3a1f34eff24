use crate::board::bitset::Bitset;
use crate::board::cell::Cell;
use crate::board::color::{CellColor, Color};
use crate::board::group::Groups;
use crate::board::position::Position;
use crate::patterns::{PatternLibrary, PatternState};
use crate::vc::changelog::ChangeLog;
use crate::vc::connection::{Connection, Kind, Rule};
use crate::vc::list::AddResult;
use crate::vc::params::Params;
use crate::vc::queue::{FullsQueue, SemiEndsQueue};
use crate::vc::rules;
use crate::vc::set::VCSet;
use crate::vc::stats::Statistics;
use crate::NUM_CELLS;

/// owns everything mutable about a single VC build: the work queues, the
/// adjacency cache between captains with an established Full, and
/// running statistics. the `VCSet` and `ChangeLog` it builds into are
/// owned by the caller and passed in by reference, per the resource
/// model: a solver may run many builders concurrently over disjoint
/// sets, but never share one builder across threads.
pub struct VCBuilder {
    params: Params,
    stats: Statistics,
    fulls_queue: FullsQueue,
    semis_queue: SemiEndsQueue,
    nbs: Vec<Bitset>,
}

impl VCBuilder {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            stats: Statistics::new(),
            fulls_queue: FullsQueue::new(),
            semis_queue: SemiEndsQueue::new(),
            nbs: vec![Bitset::empty(); NUM_CELLS],
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// build a VCSet for `color` from scratch against `position`.
    pub fn build_static(
        &mut self,
        set: &mut VCSet,
        groups: &Groups,
        position: &Position,
        pattern_state: &mut PatternState,
        library: &PatternLibrary,
        log: &mut ChangeLog,
    ) {
        set.clear();
        self.stats.reset();
        self.fulls_queue.clear();
        self.semis_queue.clear();
        self.nbs.iter_mut().for_each(|b| *b = Bitset::empty());

        let color = set.color();
        pattern_state.update(position, color, library);

        self.add_base_vcs(set, groups, position, color, log);
        if self.params.use_patterns {
            self.add_pattern_vcs(set, groups, position, color, library, log);
        }
        self.fixed_point(set, groups, pattern_state, log);
    }

    /// build a VCSet incrementally: `set` holds the lattice from the
    /// position *before* `added[Black]`/`added[White]` were played.
    /// `old_groups`/`new_groups` are the partitions before and after.
    pub fn build_incremental(
        &mut self,
        set: &mut VCSet,
        old_groups: &Groups,
        new_groups: &Groups,
        position: &Position,
        pattern_state: &mut PatternState,
        library: &PatternLibrary,
        added_black: Bitset,
        added_white: Bitset,
        log: &mut ChangeLog,
    ) {
        debug_assert!(added_black.and(&added_white).none());
        self.stats.reset();
        self.fulls_queue.clear();
        self.semis_queue.clear();

        let color = set.color();
        let (added_own, added_other) = match color {
            Color::Black => (added_black, added_white),
            Color::White => (added_white, added_black),
        };

        pattern_state.update(position, color, library);

        self.kill_opponent_touched(set, old_groups, added_other, log);
        self.merge_and_shrink(set, old_groups, new_groups, added_own, log);
        if self.params.use_patterns {
            self.add_pattern_vcs(set, new_groups, position, color, library, log);
        }
        self.rebuild_nbs(set, new_groups, position, color);
        self.fixed_point(set, new_groups, pattern_state, log);
    }

    // ---- static build helpers ----------------------------------------

    fn add_base_vcs(&mut self, set: &mut VCSet, groups: &Groups, position: &Position, color: Color, log: &mut ChangeLog) {
        for captain in groups.captains() {
            // a Base VC trivially connects an owned group (a stone group or
            // an edge sentinel) to an adjacent empty cell. an empty cell is
            // not itself an owned group, so unclaimed singleton captains
            // must not originate one: two empty cells are not already
            // connected just by sitting next to each other.
            if groups.color_of(captain) != CellColor::Stone(color) {
                continue;
            }
            let group = groups.group(captain);
            for y in group.nbs(position, color).iter() {
                if !position.color(y).is_empty() {
                    continue;
                }
                self.stats.base_attempts += 1;
                let vc = Connection::full(captain, y, Bitset::empty(), Rule::Base);
                if self.insert_full(set, vc, log) {
                    self.stats.base_successes += 1;
                }
            }
        }
    }

    fn add_pattern_vcs(
        &mut self,
        set: &mut VCSet,
        groups: &Groups,
        position: &Position,
        color: Color,
        library: &PatternLibrary,
        log: &mut ChangeLog,
    ) {
        for bridge in library.bridges() {
            if !position.color(bridge.x).is_own_or_empty(color) || !position.color(bridge.y).is_own_or_empty(color) {
                continue;
            }
            let on_edge = bridge.x.is_edge() || bridge.y.is_edge();
            if !on_edge && !self.params.use_non_edge_patterns {
                continue;
            }
            let opponent = color.other();
            if bridge.carrier.iter().any(|c| position.color(c) == CellColor::Stone(opponent)) {
                continue;
            }
            let x_captain = groups.captain(bridge.x);
            let y_captain = groups.captain(bridge.y);
            if x_captain == y_captain {
                continue;
            }
            // at least one side must already be an owned group (a stone
            // group or an edge sentinel); a template between two plain
            // unclaimed cells isn't a connection either player holds yet.
            let x_owned = groups.color_of(x_captain) == CellColor::Stone(color);
            let y_owned = groups.color_of(y_captain) == CellColor::Stone(color);
            if !x_owned && !y_owned {
                continue;
            }
            let carrier = bridge.carrier.andnot(&position.stones(color));
            self.stats.pattern_attempts += 1;
            let vc = Connection::full(x_captain, y_captain, carrier, Rule::Pattern);
            if self.insert_full(set, vc, log) {
                self.stats.pattern_successes += 1;
            }
        }
    }

    // ---- incremental build helpers ------------------------------------

    fn kill_opponent_touched(&mut self, set: &mut VCSet, old_groups: &Groups, added_other: Bitset, log: &mut ChangeLog) {
        let captains = old_groups.captains();
        for i in 0..captains.len() {
            for j in (i + 1)..captains.len() {
                let (x, y) = (captains[i], captains[j]);
                if let Some(list) = set.get_list(Kind::Full, x, y) {
                    if list.union().and(&added_other).any() {
                        let killed = set.list_mut(Kind::Full, x, y).remove_all_containing(&added_other, log);
                        self.stats.killed_0 += killed.len() as u64;
                    }
                }
                if let Some(list) = set.get_list(Kind::Semi, x, y) {
                    if list.union().and(&added_other).any() {
                        let killed = set.list_mut(Kind::Semi, x, y).remove_all_containing(&added_other, log);
                        self.stats.killed_1 += killed.len() as u64;
                    }
                }
            }
        }
    }

    fn merge_and_shrink(
        &mut self,
        set: &mut VCSet,
        old_groups: &Groups,
        new_groups: &Groups,
        added_own: Bitset,
        log: &mut ChangeLog,
    ) {
        let mut affected = added_own;
        for member in added_own.iter() {
            for n in member.neighbors().iter() {
                if old_groups.is_captain(n) {
                    affected.set(n);
                }
            }
        }

        let old_captains = old_groups.captains();
        for i in 0..old_captains.len() {
            for j in (i + 1)..old_captains.len() {
                let (x, y) = (old_captains[i], old_captains[j]);
                let x_is_affected = affected.test(x) || !new_groups.is_captain(x);
                let y_is_affected = affected.test(y) || !new_groups.is_captain(y);
                if !x_is_affected && !y_is_affected {
                    continue;
                }
                let cx = new_groups.captain(x);
                let cy = new_groups.captain(y);
                if cx == cy {
                    continue;
                }
                self.move_and_shrink_pair(set, x, y, cx, cy, added_own, log);
            }
        }
    }

    fn move_and_shrink_pair(
        &mut self,
        set: &mut VCSet,
        x: Cell,
        y: Cell,
        cx: Cell,
        cy: Cell,
        added: Bitset,
        log: &mut ChangeLog,
    ) {
        let merging = (x, y) != (cx, cy);

        let removed_fulls = set.list_mut(Kind::Full, x, y).remove_all_containing(&added, log);
        if merging {
            let surviving: Vec<Connection> = set
                .get_list(Kind::Full, x, y)
                .map(|l| l.entries().to_vec())
                .unwrap_or_default();
            for vc in surviving {
                if let Some(removed) = set.list_mut(Kind::Full, x, y).remove_exact(&vc.carrier, log) {
                    if set.list_mut(Kind::Full, cx, cy).add(removed.clone(), log) != AddResult::Failed {
                        self.push_full(cx, cy, removed);
                    }
                }
            }
        }
        for vc in removed_fulls {
            let shrunk = rules::shrink_full(&vc, &added, cx, cy);
            let result = set.list_mut(Kind::Full, cx, cy).add(shrunk.clone(), log);
            if result != AddResult::Failed {
                self.stats.shrunk_0 += 1;
                self.push_full(cx, cy, shrunk);
            }
        }

        let removed_semis = set.list_mut(Kind::Semi, x, y).remove_all_containing(&added, log);
        if merging {
            let surviving: Vec<Connection> = set
                .get_list(Kind::Semi, x, y)
                .map(|l| l.entries().to_vec())
                .unwrap_or_default();
            for vc in surviving {
                if let Some(removed) = set.list_mut(Kind::Semi, x, y).remove_exact(&vc.carrier, log) {
                    if set.list_mut(Kind::Semi, cx, cy).add(removed, log) != AddResult::Failed {
                        self.semis_queue.push(cx, cy);
                    }
                }
            }
        }
        for vc in removed_semis {
            let key = vc.key.expect("semi list entries always have a key");
            if !added.test(key) {
                if let Some(shrunk) = rules::shrink_semi(&vc, &added, cx, cy) {
                    if set.list_mut(Kind::Semi, cx, cy).add(shrunk, log) != AddResult::Failed {
                        self.stats.shrunk_1 += 1;
                        self.semis_queue.push(cx, cy);
                    }
                }
            } else if let Some(upgraded) = rules::upgrade_semi(&vc, &added, cx, cy) {
                let carrier = upgraded.carrier;
                if set.list_mut(Kind::Full, cx, cy).add(upgraded.clone(), log) != AddResult::Failed {
                    set.list_mut(Kind::Semi, cx, cy).remove_supersets_of(&carrier, log);
                    self.stats.upgraded += 1;
                    self.push_full(cx, cy, upgraded);
                }
            }
        }
    }

    fn rebuild_nbs(&mut self, set: &VCSet, groups: &Groups, position: &Position, color: Color) {
        self.nbs.iter_mut().for_each(|b| *b = Bitset::empty());
        let captains = groups.captains();
        for i in 0..captains.len() {
            let x = captains[i];
            if !position.color(x).is_own_or_empty(color) {
                continue;
            }
            for j in (i + 1)..captains.len() {
                let y = captains[j];
                if !position.color(y).is_own_or_empty(color) {
                    continue;
                }
                if set.exists(x, y, Kind::Full) {
                    self.nbs[x.index()].set(y);
                    self.nbs[y.index()].set(x);
                }
            }
        }
    }

    // ---- shared insertion helpers --------------------------------------

    fn insert_full(&mut self, set: &mut VCSet, vc: Connection, log: &mut ChangeLog) -> bool {
        let (x, y) = vc.endpoints();
        let result = set.list_mut(Kind::Full, x, y).add(vc.clone(), log);
        if result == AddResult::Failed {
            return false;
        }
        self.push_full(x, y, vc);
        true
    }

    fn insert_semi(&mut self, set: &mut VCSet, vc: Connection, log: &mut ChangeLog) -> bool {
        let (x, y) = vc.endpoints();
        let result = set.list_mut(Kind::Semi, x, y).add(vc, log);
        if result == AddResult::Failed {
            return false;
        }
        self.semis_queue.push(x, y);
        true
    }

    fn push_full(&mut self, x: Cell, y: Cell, vc: Connection) {
        self.nbs[x.index()].set(y);
        self.nbs[y.index()].set(x);
        self.fulls_queue.push(x, y, vc.carrier);
    }

    // ---- fixed-point search --------------------------------------------

    fn fixed_point(&mut self, set: &mut VCSet, groups: &Groups, pattern_state: &PatternState, log: &mut ChangeLog) {
        loop {
            if let Some(full_ref) = self.fulls_queue.pop() {
                self.process_fulls(full_ref.x, full_ref.y, full_ref.carrier, set, groups, pattern_state, log);
            } else if let Some((x, y)) = self.semis_queue.pop() {
                self.process_semis(x, y, set, pattern_state, log);
            } else {
                break;
            }
            if self.params.abort_on_winning_connection && set.has_winning_connection() {
                break;
            }
        }
    }

    fn process_fulls(
        &mut self,
        x: Cell,
        y: Cell,
        carrier: Bitset,
        set: &mut VCSet,
        groups: &Groups,
        pattern_state: &PatternState,
        log: &mut ChangeLog,
    ) {
        let idx = match set.get_list(Kind::Full, x, y).and_then(|l| l.find_index(&carrier)) {
            Some(idx) => idx,
            None => return,
        };
        let vc = set.get_list(Kind::Full, x, y).unwrap().entries()[idx].clone();
        if vc.processed {
            return;
        }
        self.and_closure(&vc, set, groups, pattern_state, log);
        let idx_after = set.get_list(Kind::Full, x, y).and_then(|l| l.find_index(&carrier));
        if let Some(idx_after) = idx_after {
            set.list_mut(Kind::Full, x, y).mark_processed(idx_after, log);
        }
    }

    /// AND-closure: extend `vc` one hop past either endpoint, combining
    /// with every existing Full to a neighbor (per `nbs`) through that
    /// endpoint as the intermediate, per the AND rule.
    fn and_closure(&mut self, vc: &Connection, set: &mut VCSet, groups: &Groups, pattern_state: &PatternState, log: &mut ChangeLog) {
        let p0 = groups.captain(vc.x);
        let p1 = groups.captain(vc.y);
        for &(pi, other) in &[(p0, p1), (p1, p0)] {
            if pi.is_edge() && !self.params.and_over_edge {
                continue;
            }
            let pi_is_own = matches!(groups.color_of(pi), CellColor::Stone(c) if c == set.color());
            let candidates: Vec<Cell> = self.nbs[pi.index()].iter().collect();
            for z in candidates {
                if z == p0 || z == p1 || vc.carrier.test(z) {
                    continue;
                }
                let cap_set = pattern_state.cap(p0).or(&pattern_state.cap(p1)).or(&pattern_state.cap(z));
                let restricted = vc.carrier.and(&cap_set.not());
                let siblings: Vec<Connection> = match set.get_list(Kind::Full, z, pi) {
                    Some(list) => {
                        if list.soft_intersection().and(&restricted).any() {
                            continue;
                        }
                        list.soft_prefix().iter().filter(|a| a.processed).cloned().collect()
                    }
                    None => continue,
                };
                for a in siblings {
                    if a.carrier.test(other) {
                        continue;
                    }
                    if pi_is_own {
                        self.stats.and_full_attempts += 1;
                    } else {
                        self.stats.and_semi_attempts += 1;
                    }
                    if let Some(new_vc) = rules::and_rule(z, other, pi, pi_is_own, a.carrier, vc.carrier, cap_set, Rule::And) {
                        match new_vc.kind {
                            Kind::Full => {
                                if self.insert_full(set, new_vc, log) {
                                    self.stats.and_full_successes += 1;
                                }
                            }
                            Kind::Semi => {
                                if self.insert_semi(set, new_vc, log) {
                                    self.stats.and_semi_successes += 1;
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// OR-combine the semis on `(x, y)`; falls back to the whole-list
    /// union (tagged `All`) when no bounded/enhanced subset search
    /// succeeds but the full list still collapses into `cap_set`.
    fn process_semis(&mut self, x: Cell, y: Cell, set: &mut VCSet, pattern_state: &PatternState, log: &mut ChangeLog) {
        let cap_set = pattern_state.cap(x).or(&pattern_state.cap(y));
        let snapshot: Vec<Connection> = match set.get_list(Kind::Semi, x, y) {
            Some(list) => {
                if list.hard_intersection().andnot(&cap_set).any() {
                    return;
                }
                list.soft_prefix().to_vec()
            }
            None => return,
        };
        if snapshot.len() >= 2 {
            self.stats.do_ors += 1;
            self.stats.or_attempts += 1;
            let combined = if self.params.max_ors < crate::ENHANCED_OR_THRESHOLD {
                rules::or_rule_bounded(&snapshot, cap_set, self.params.max_ors)
            } else {
                rules::or_rule_enhanced(&snapshot, cap_set, self.params.use_greedy_union)
            };
            if let Some(carrier) = combined {
                self.stats.or_successes += 1;
                self.stats.good_ors += 1;
                let vc = Connection::full(x, y, carrier, Rule::Or);
                self.insert_full(set, vc, log);
            } else if let Some(carrier) = rules::whole_list_union(&snapshot, cap_set, self.params.use_greedy_union) {
                self.stats.good_ors += 1;
                let vc = Connection::full(x, y, carrier, Rule::All);
                self.insert_full(set, vc, log);
            }
        }

        let list = set.list_mut(Kind::Semi, x, y);
        for s in &snapshot {
            if let Some(idx) = list.find_index(&s.carrier) {
                list.mark_processed(idx, log);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::color::Color;
    use crate::DEFAULT_SOFT_LIMIT;

    #[test]
    fn static_build_on_empty_board_has_no_winning_connection() {
        let position = Position::empty();
        let groups = Groups::compute(&position);
        let library = PatternLibrary::generated();
        let mut pattern_state = PatternState::new();
        let mut set = VCSet::new(Color::Black, DEFAULT_SOFT_LIMIT);
        let mut log = ChangeLog::new();
        let mut builder = VCBuilder::new(Params::default());

        builder.build_static(&mut set, &groups, &position, &mut pattern_state, &library, &mut log);
        assert!(!set.has_winning_connection(), "black holds no stones, so no Full(north, south) can exist yet");
    }

    #[test]
    fn base_vc_exists_between_edge_and_its_first_row() {
        let position = Position::empty();
        let groups = Groups::compute(&position);
        let library = PatternLibrary::generated();
        let mut pattern_state = PatternState::new();
        let mut set = VCSet::new(Color::Black, DEFAULT_SOFT_LIMIT);
        let mut log = ChangeLog::new();
        let mut builder = VCBuilder::new(Params::default());
        builder.build_static(&mut set, &groups, &position, &mut pattern_state, &library, &mut log);

        let north = crate::board::cell::NORTH;
        let a1 = Cell::from_rc(0, 0);
        assert!(set.exists(north, a1, Kind::Full));
    }
}
