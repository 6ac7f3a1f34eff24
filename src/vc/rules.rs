use crate::board::bitset::Bitset;
use crate::board::cell::Cell;
use crate::vc::connection::{Connection, Rule};

/// `ShrinkFull`: re-endpoint and drop every cell in `added` from the
/// carrier. `added` is disjoint from the carrier's remaining cells by
/// construction of the caller (only played cells are ever passed).
pub fn shrink_full(vc: &Connection, added: &Bitset, x: Cell, y: Cell) -> Connection {
    Connection::full(x, y, vc.carrier.andnot(added), vc.rule)
}

/// `ShrinkSemi`: like `shrink_full`, but only valid while the key
/// survives in the shrunk carrier. returns `None` when it doesn't --
/// the caller must `upgrade_semi` instead.
pub fn shrink_semi(vc: &Connection, added: &Bitset, x: Cell, y: Cell) -> Option<Connection> {
    let key = vc.key.expect("shrink_semi is only valid for a Semi");
    let carrier = vc.carrier.andnot(added);
    if carrier.test(key) {
        Some(Connection::semi(x, y, carrier, key, vc.rule))
    } else {
        None
    }
}

/// `UpgradeSemi`: valid iff the semi's key was itself just played.
pub fn upgrade_semi(vc: &Connection, added: &Bitset, x: Cell, y: Cell) -> Option<Connection> {
    let key = vc.key.expect("upgrade_semi is only valid for a Semi");
    if !added.test(key) {
        return None;
    }
    Some(Connection::full(x, y, vc.carrier.andnot(added), vc.rule))
}

/// the two possible productions of combining two connections through an
/// intermediate cell or group `z`.
#[derive(Debug, Clone, Copy)]
pub enum Combined {
    Full(Bitset),
    Semi(Bitset, Cell),
}

/// the AND rule (spec 4.4): combine `a : x <-> z` and `b : z <-> y` into
/// one connection `x <-> y`. `z_is_own` means `z` is occupied by the
/// player (a group to route through); otherwise `z` is an empty cell
/// that must be added to the carrier as the semi's key.
pub fn and_combine(a_carrier: Bitset, b_carrier: Bitset, cap_set: Bitset, z: Cell, z_is_own: bool) -> Option<Combined> {
    let intersection = a_carrier.and(&b_carrier);
    let union = a_carrier.or(&b_carrier);
    let base = if z_is_own { union } else { union.or(&Bitset::singleton(z)) };

    if intersection.none() {
        return Some(produce(base, z, z_is_own));
    }
    if intersection.is_subset_of(&cap_set) {
        return Some(produce(base.or(&cap_set), z, z_is_own));
    }
    // singleton-intersection fallback: one unresolved shared cell still
    // lets us commit to a Semi keyed on that cell.
    let remainder = intersection.andnot(&cap_set);
    if remainder.count() == 1 {
        let key = remainder.first_set().expect("count == 1");
        return Some(Combined::Semi(base, key));
    }
    None
}

fn produce(carrier: Bitset, z: Cell, z_is_own: bool) -> Combined {
    if z_is_own {
        Combined::Full(carrier)
    } else {
        Combined::Semi(carrier, z)
    }
}

/// wraps `and_combine`'s result as a fully-invariant-checked `Connection`.
pub fn and_rule(
    x: Cell,
    y: Cell,
    z: Cell,
    z_is_own: bool,
    a_carrier: Bitset,
    b_carrier: Bitset,
    cap_set: Bitset,
    rule: Rule,
) -> Option<Connection> {
    and_combine(a_carrier, b_carrier, cap_set, z, z_is_own).map(|combined| match combined {
        Combined::Full(carrier) => Connection::full(x, y, carrier, rule),
        Combined::Semi(carrier, key) => Connection::semi(x, y, carrier, key, rule),
    })
}

/// upper bound on search nodes explored by the OR combinators, so a
/// pathologically long semi list can't blow up a single build call.
const OR_SEARCH_BUDGET: usize = 200_000;

fn dfs_combine(carriers: &[Bitset], cap_set: Bitset, max_depth: usize, budget: &mut usize) -> Option<Bitset> {
    fn go(
        carriers: &[Bitset],
        cap_set: Bitset,
        start: usize,
        depth: usize,
        max_depth: usize,
        running_and: Bitset,
        running_or: Bitset,
        budget: &mut usize,
    ) -> Option<Bitset> {
        if depth >= 2 && running_and.is_subset_of(&cap_set) {
            return Some(running_or.or(&cap_set));
        }
        if depth == max_depth {
            return None;
        }
        for i in start..carriers.len() {
            if *budget == 0 {
                return None;
            }
            *budget -= 1;
            let carrier = carriers[i];
            let new_and = if depth == 0 { carrier } else { running_and.and(&carrier) };
            if depth > 0 && new_and == running_and {
                // adding this semi shrinks nothing; prune.
                continue;
            }
            let new_or = running_or.or(&carrier);
            if let Some(found) = go(carriers, cap_set, i + 1, depth + 1, max_depth, new_and, new_or, budget) {
                return Some(found);
            }
        }
        None
    }
    go(carriers, cap_set, 0, 0, max_depth, Bitset::universe(), Bitset::empty(), budget)
}

/// **Bounded OR** (`max_ors < 16`): depth-first search over subsets of
/// size 2..=max_ors of the soft-prefix processed semis, emitting the
/// first combination whose running intersection collapses into
/// `cap_set`.
pub fn or_rule_bounded(semis: &[Connection], cap_set: Bitset, max_ors: usize) -> Option<Bitset> {
    if semis.len() < 2 {
        return None;
    }
    let carriers: Vec<Bitset> = semis.iter().map(|c| c.carrier).collect();
    let mut budget = OR_SEARCH_BUDGET;
    dfs_combine(&carriers, cap_set, max_ors.min(carriers.len()), &mut budget)
}

/// **Enhanced OR** (`max_ors >= 16`): the same search, but unbounded in
/// combination size and ordered smallest-carrier-first so a small
/// witness is found quickly. guarantees a Full whenever the whole
/// list's carriers intersect only within `cap_set`, since that
/// full-list case is searched last and always succeeds.
pub fn or_rule_enhanced(semis: &[Connection], cap_set: Bitset, greedy: bool) -> Option<Bitset> {
    if semis.len() < 2 {
        return None;
    }
    let mut carriers: Vec<Bitset> = semis.iter().map(|c| c.carrier).collect();
    carriers.sort_by_key(|c| c.count());
    let mut budget = OR_SEARCH_BUDGET;
    if let Some(found) = dfs_combine(&carriers, cap_set, carriers.len(), &mut budget) {
        return Some(found);
    }
    whole_list_union(semis, cap_set, greedy)
}

/// the `All`-tagged fallback: union every carrier in the list, used when
/// no subset search succeeded but the full list's intersection still
/// collapses into `cap_set`. `greedy` selects `VCList::greedy_union`'s
/// policy (skip carriers contributing nothing new) over a plain union.
pub fn whole_list_union(semis: &[Connection], cap_set: Bitset, greedy: bool) -> Option<Bitset> {
    if semis.is_empty() {
        return None;
    }
    let running_and = semis
        .iter()
        .fold(Bitset::universe(), |acc, c| acc.and(&c.carrier));
    if running_and.andnot(&cap_set).any() {
        return None;
    }
    let union = if greedy {
        let mut acc = Bitset::empty();
        for c in semis {
            if !c.carrier.is_subset_of(&acc) {
                acc = acc.or(&c.carrier);
            }
        }
        acc
    } else {
        semis.iter().fold(Bitset::empty(), |acc, c| acc.or(&c.carrier))
    };
    Some(union.or(&cap_set))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::cell::Cell;

    fn c(i: usize) -> Cell {
        Cell::from(i)
    }

    #[test]
    fn and_rule_through_own_group_produces_full() {
        let x = c(0);
        let y = c(1);
        let z = c(2);
        let a = Bitset::singleton(c(5));
        let b = Bitset::singleton(c(6));
        let vc = and_rule(x, y, z, true, a, b, Bitset::empty(), Rule::And).unwrap();
        assert_eq!(vc.kind, crate::vc::connection::Kind::Full);
        assert!(vc.carrier.test(c(5)) && vc.carrier.test(c(6)));
    }

    #[test]
    fn and_rule_through_empty_cell_produces_semi_keyed_on_z() {
        let x = c(0);
        let y = c(1);
        let z = c(2);
        let a = Bitset::singleton(c(5));
        let b = Bitset::singleton(c(6));
        let vc = and_rule(x, y, z, false, a, b, Bitset::empty(), Rule::And).unwrap();
        assert_eq!(vc.kind, crate::vc::connection::Kind::Semi);
        assert_eq!(vc.key, Some(z));
        assert!(vc.carrier.test(z));
    }

    #[test]
    fn and_rule_singleton_intersection_falls_back_to_semi() {
        let x = c(0);
        let y = c(1);
        let z = c(2);
        let a = Bitset::singleton(c(5)).or(&Bitset::singleton(c(6)));
        let b = Bitset::singleton(c(5)).or(&Bitset::singleton(c(7)));
        let vc = and_rule(x, y, z, true, a, b, Bitset::empty(), Rule::And).unwrap();
        assert_eq!(vc.kind, crate::vc::connection::Kind::Semi);
        assert_eq!(vc.key, Some(c(5)));
    }

    #[test]
    fn and_rule_fails_on_two_cell_unresolved_intersection() {
        let x = c(0);
        let y = c(1);
        let z = c(2);
        let a = Bitset::singleton(c(5)).or(&Bitset::singleton(c(6)));
        let b = Bitset::singleton(c(5)).or(&Bitset::singleton(c(6)));
        let vc = and_rule(x, y, z, true, a, b, Bitset::empty(), Rule::And);
        assert!(vc.is_none());
    }

    #[test]
    fn bounded_or_combines_two_semis_with_disjoint_carriers() {
        let x = c(0);
        let y = c(1);
        let s1 = Connection::semi(x, y, Bitset::singleton(c(5)), c(5), Rule::Base);
        let s2 = Connection::semi(x, y, Bitset::singleton(c(6)), c(6), Rule::Base);
        let carrier = or_rule_bounded(&[s1, s2], Bitset::empty(), 4).unwrap();
        assert!(carrier.test(c(5)) && carrier.test(c(6)));
    }

    #[test]
    fn whole_list_union_matches_enhanced_fallback() {
        let x = c(0);
        let y = c(1);
        let s1 = Connection::semi(x, y, Bitset::singleton(c(5)), c(5), Rule::Base);
        let s2 = Connection::semi(x, y, Bitset::singleton(c(6)), c(6), Rule::Base);
        let via_enhanced = or_rule_enhanced(&[s1.clone(), s2.clone()], Bitset::empty(), false).unwrap();
        let via_union = whole_list_union(&[s1, s2], Bitset::empty(), false).unwrap();
        assert_eq!(via_enhanced, via_union);
    }
}
