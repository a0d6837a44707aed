use super::*;
use crate::core::error::SectionError;
use proptest::prelude::*;

fn section(up: u64, down: u64, distance: u32) -> Section {
    Section::new(up, down, distance).unwrap()
}

fn sections(list: &[(u64, u64, u32)]) -> Sections {
    Sections::from_sections(list.iter().map(|&(u, d, l)| section(u, d, l)).collect())
}

fn stations(ids: &[u64]) -> Vec<StationId> {
    ids.iter().copied().map(StationId::new).collect()
}

/// Sorted copy of the sections, for order-independent comparison
fn sorted(sections: &Sections) -> Vec<(u64, u64, u32)> {
    let mut out: Vec<_> = sections
        .iter()
        .map(|s| (s.up_station().get(), s.down_station().get(), s.distance().get()))
        .collect();
    out.sort_unstable();
    out
}

#[test]
fn first_insert_is_accepted_unconditionally() {
    let mut line = Sections::new();
    line.insert(section(1, 2, 10)).unwrap();
    assert_eq!(line.ordered_stations().unwrap(), stations(&[1, 2]));
    assert_eq!(line.total_distance(), 10);
    assert_eq!(line.as_slice(), &[section(1, 2, 10)]);
    assert!(line.contains_station(StationId::new(2)));
    assert!(!line.contains_station(StationId::new(3)));
}

#[test]
fn split_from_up_station_conserves_distance() {
    let mut line = sections(&[(1, 2, 10)]);
    line.insert(section(1, 3, 4)).unwrap();

    assert_eq!(sorted(&line), vec![(1, 3, 4), (3, 2, 6)]);
    assert_eq!(line.ordered_stations().unwrap(), stations(&[1, 3, 2]));
    assert_eq!(line.total_distance(), 10);

    line.insert(section(3, 4, 5)).unwrap();
    assert_eq!(sorted(&line), vec![(1, 3, 4), (3, 4, 5), (4, 2, 1)]);
    assert_eq!(line.ordered_stations().unwrap(), stations(&[1, 3, 4, 2]));
    assert_eq!(line.total_distance(), 10);
}

#[test]
fn split_from_down_station_conserves_distance() {
    let mut line = sections(&[(1, 2, 10)]);
    line.insert(section(3, 2, 3)).unwrap();

    assert_eq!(sorted(&line), vec![(1, 3, 7), (3, 2, 3)]);
    assert_eq!(line.ordered_stations().unwrap(), stations(&[1, 3, 2]));
    assert_eq!(line.total_distance(), 10);
}

#[test]
fn prepend_at_head_leaves_existing_sections_alone() {
    let mut line = sections(&[(1, 2, 10), (2, 3, 5)]);
    line.insert(section(9, 1, 7)).unwrap();

    assert_eq!(sorted(&line), vec![(1, 2, 10), (2, 3, 5), (9, 1, 7)]);
    assert_eq!(line.ordered_stations().unwrap(), stations(&[9, 1, 2, 3]));
    assert_eq!(line.total_distance(), 22);
}

#[test]
fn append_at_tail_leaves_existing_sections_alone() {
    let mut line = sections(&[(1, 2, 10), (2, 3, 5)]);
    line.insert(section(3, 4, 2)).unwrap();

    assert_eq!(sorted(&line), vec![(1, 2, 10), (2, 3, 5), (3, 4, 2)]);
    assert_eq!(line.ordered_stations().unwrap(), stations(&[1, 2, 3, 4]));
    assert_eq!(line.total_distance(), 17);
}

#[test]
fn duplicate_sections_are_rejected_without_mutation() {
    let mut line = sections(&[(1, 2, 10), (2, 3, 5)]);
    let snapshot = line.clone();

    assert_eq!(
        line.insert(section(1, 2, 3)),
        Err(SectionError::DuplicateSection {
            up: StationId::new(1),
            down: StationId::new(2)
        })
    );
    // non-adjacent stations already on the line
    assert!(matches!(
        line.insert(section(1, 3, 3)),
        Err(SectionError::DuplicateSection { .. })
    ));
    assert_eq!(line, snapshot);
}

#[test]
fn reverse_direction_duplicate_is_rejected() {
    let mut line = sections(&[(1, 2, 10)]);
    let snapshot = line.clone();
    assert!(matches!(
        line.insert(section(2, 1, 10)),
        Err(SectionError::DuplicateSection { .. })
    ));
    assert_eq!(line, snapshot);
}

#[test]
fn disconnected_sections_are_rejected_without_mutation() {
    let mut line = sections(&[(1, 2, 10)]);
    let snapshot = line.clone();
    assert_eq!(
        line.insert(section(7, 8, 3)),
        Err(SectionError::DisconnectedSection {
            up: StationId::new(7),
            down: StationId::new(8)
        })
    );
    assert_eq!(line, snapshot);
}

#[test]
fn split_that_does_not_fit_is_rejected_without_mutation() {
    let mut line = sections(&[(1, 2, 10)]);
    let snapshot = line.clone();

    let err = line.insert(section(1, 3, 10)).unwrap_err();
    assert!(matches!(err, SectionError::SectionTooLong { .. }));
    assert!(!err.is_internal_defect());

    assert!(matches!(
        line.insert(section(3, 2, 15)),
        Err(SectionError::SectionTooLong { .. })
    ));
    assert_eq!(line, snapshot);
}

#[test]
fn removing_interior_station_merges_distances() {
    let mut line = sections(&[(1, 2, 4), (2, 3, 6)]);
    line.remove_station(StationId::new(2)).unwrap();

    assert_eq!(sorted(&line), vec![(1, 3, 10)]);
    assert_eq!(line.ordered_stations().unwrap(), stations(&[1, 3]));
    assert_eq!(line.total_distance(), 10);
}

#[test]
fn removing_interior_station_merges_regardless_of_storage_order() {
    let mut line = sections(&[(2, 3, 6), (3, 4, 1), (1, 2, 4)]);
    line.remove_station(StationId::new(2)).unwrap();

    assert_eq!(sorted(&line), vec![(1, 3, 10), (3, 4, 1)]);
    assert_eq!(line.ordered_stations().unwrap(), stations(&[1, 3, 4]));
}

#[test]
fn merge_that_overflows_is_rejected_without_mutation() {
    let mut line = sections(&[(1, 2, u32::MAX), (2, 3, 1)]);
    let snapshot = line.clone();

    let err = line.remove_station(StationId::new(2)).unwrap_err();
    assert!(matches!(err, SectionError::DistanceOverflow { .. }));
    assert!(!err.is_internal_defect());
    assert_eq!(err.status_code(), 400);
    assert_eq!(line, snapshot);
}

#[test]
fn removing_terminals_drops_one_section() {
    let mut line = sections(&[(1, 2, 4), (2, 3, 6), (3, 4, 2)]);

    line.remove_station(StationId::new(1)).unwrap();
    assert_eq!(sorted(&line), vec![(2, 3, 6), (3, 4, 2)]);
    assert_eq!(line.total_distance(), 8);

    line.remove_station(StationId::new(4)).unwrap();
    assert_eq!(sorted(&line), vec![(2, 3, 6)]);
    assert_eq!(line.ordered_stations().unwrap(), stations(&[2, 3]));
}

#[test]
fn line_keeps_at_least_one_section() {
    let mut line = sections(&[(1, 2, 4), (2, 3, 6)]);
    line.remove_station(StationId::new(3)).unwrap();
    assert_eq!(line.len(), 1);

    let snapshot = line.clone();
    assert_eq!(
        line.remove_station(StationId::new(1)),
        Err(SectionError::SingleSection)
    );
    assert_eq!(line, snapshot);
}

#[test]
fn removing_unknown_station_is_not_found() {
    let mut line = sections(&[(1, 2, 4), (2, 3, 6)]);
    let snapshot = line.clone();
    let err = line.remove_station(StationId::new(99)).unwrap_err();
    assert_eq!(err, SectionError::StationNotFound(StationId::new(99)));
    assert_eq!(err.status_code(), 404);
    assert_eq!(line, snapshot);
}

#[test]
fn ordered_stations_of_empty_collection_is_empty() {
    assert!(Sections::new().ordered_stations().unwrap().is_empty());
    assert_eq!(Sections::new().total_distance(), 0);
}

#[test]
fn ordered_stations_detects_branches() {
    let branched = sections(&[(1, 2, 4), (1, 3, 6)]);
    let err = branched.ordered_stations().unwrap_err();
    assert!(err.is_internal_defect());
}

#[test]
fn ordered_stations_detects_two_heads() {
    let two_heads = sections(&[(1, 3, 4), (2, 3, 6)]);
    assert!(matches!(
        two_heads.ordered_stations(),
        Err(SectionError::MalformedPath(_))
    ));
}

#[test]
fn ordered_stations_detects_cycles_and_fragments() {
    let cycle = sections(&[(1, 2, 4), (2, 3, 6), (3, 1, 2)]);
    assert!(matches!(cycle.ordered_stations(), Err(SectionError::MalformedPath(_))));

    // a path plus a detached cycle
    let fragment = sections(&[(1, 2, 4), (5, 6, 1), (6, 5, 1)]);
    assert!(matches!(fragment.ordered_stations(), Err(SectionError::MalformedPath(_))));

    assert!(Sections::try_from_sections(cycle.into_vec()).is_err());
}

#[test]
fn insert_into_branched_collection_reports_defect() {
    let mut branched = sections(&[(1, 2, 4), (1, 3, 6)]);
    let snapshot = branched.clone();
    let err = branched.insert(section(1, 4, 1)).unwrap_err();
    assert!(err.is_internal_defect());
    assert_eq!(branched, snapshot);
}

#[test]
fn line_entity_delegates_to_sections() {
    let mut line = Line::new(LineId::new(1), "신분당선", "bg-red-600", section(1, 2, 10)).unwrap();
    line.add_section(section(2, 3, 5)).unwrap();
    line.add_section(section(1, 4, 3)).unwrap();

    assert_eq!(line.stations().unwrap(), stations(&[1, 4, 2, 3]));
    assert_eq!(line.total_distance(), 15);

    line.remove_station(StationId::new(4)).unwrap();
    assert_eq!(line.stations().unwrap(), stations(&[1, 2, 3]));

    line.update("분당선", "bg-yellow-600").unwrap();
    assert_eq!(line.name(), "분당선");
    assert_eq!(line.color(), "bg-yellow-600");
    assert!(line.update("  ", "bg-blue-600").is_err());
    assert_eq!(line.name(), "분당선");
}

#[test]
fn line_from_parts_checks_sections() {
    let ok = Line::from_parts(
        LineId::new(2),
        "2호선",
        "green",
        vec![section(2, 3, 1), section(1, 2, 1)],
    )
    .unwrap();
    assert_eq!(ok.stations().unwrap(), stations(&[1, 2, 3]));

    assert!(Line::from_parts(LineId::new(2), "2호선", "green", Vec::new()).is_err());
    let err = Line::from_parts(
        LineId::new(2),
        "2호선",
        "green",
        vec![section(1, 2, 1), section(1, 3, 1)],
    )
    .unwrap_err();
    assert!(err.is_server_error());
}

/// One step of a random edit sequence
#[derive(Debug, Clone)]
enum Op {
    Prepend(u32),
    Append(u32),
    SplitFromUp(usize, u32),
    SplitFromDown(usize, u32),
    Remove(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u32..30).prop_map(Op::Prepend),
        (1u32..30).prop_map(Op::Append),
        (any::<usize>(), 1u32..30).prop_map(|(i, d)| Op::SplitFromUp(i, d)),
        (any::<usize>(), 1u32..30).prop_map(|(i, d)| Op::SplitFromDown(i, d)),
        any::<usize>().prop_map(Op::Remove),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn edits_preserve_single_path(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut line = sections(&[(0, 1, 20)]);
        let mut next_station = 2u64;

        for op in ops {
            let order = line.ordered_stations().unwrap();
            let head = order[0];
            let tail = order[order.len() - 1];
            let before_total = line.total_distance();
            let before = line.clone();
            let fresh = StationId::new(next_station);

            let (result, expected_total) = match op {
                Op::Prepend(d) => {
                    let s = Section::new(fresh, head, d).unwrap();
                    (line.insert(s), before_total + u64::from(d))
                }
                Op::Append(d) => {
                    let s = Section::new(tail, fresh, d).unwrap();
                    (line.insert(s), before_total + u64::from(d))
                }
                Op::SplitFromUp(i, d) => {
                    let at = order[i % (order.len() - 1)];
                    let s = Section::new(at, fresh, d).unwrap();
                    (line.insert(s), before_total)
                }
                Op::SplitFromDown(i, d) => {
                    let at = order[1 + i % (order.len() - 1)];
                    let s = Section::new(fresh, at, d).unwrap();
                    (line.insert(s), before_total)
                }
                Op::Remove(i) => {
                    let at = order[i % order.len()];
                    let expected = if at == head || at == tail {
                        let dropped = line.iter().find(|s| s.touches(at)).unwrap();
                        before_total - u64::from(dropped.distance().get())
                    } else {
                        before_total
                    };
                    (line.remove_station(at), expected)
                }
            };
            next_station += 1;

            match result {
                Ok(()) => {
                    prop_assert_eq!(line.total_distance(), expected_total);
                }
                Err(err) => {
                    let expected = matches!(
                        err,
                        SectionError::SectionTooLong { .. } | SectionError::SingleSection
                    );
                    prop_assert!(expected, "unexpected error {:?}", err);
                    prop_assert_eq!(&line, &before);
                }
            }

            let after = line.ordered_stations().unwrap();
            prop_assert_eq!(after.len(), line.len() + 1);
        }
    }
}
