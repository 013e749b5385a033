// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generate/parse round-trip properties

use panelcam_model::{Dimensions, Hole, HoleKind, HoleSide, Part};
use panelcam_mpr::{generate_program, parse_program};

const POS_TOL: f64 = 0.1;

fn vertical(x: f64, y: f64, diameter: f64, depth: f64) -> Hole {
    Hole {
        x,
        y,
        z: 18.0,
        diameter,
        depth,
        kind: HoleKind::Vertical,
        side: HoleSide::Top,
        flagged: false,
    }
}

fn part_with(holes: Vec<Hole>) -> Part {
    let mut part = Part::new("Base", Dimensions::new(800.0, 500.0, 18.0));
    part.holes = holes;
    part
}

/// Multiset match of (x, y, diameter, depth) within tolerance
fn assert_same_holes(expected: &[Hole], actual: &[Hole]) {
    assert_eq!(expected.len(), actual.len());
    let mut remaining: Vec<&Hole> = actual.iter().collect();
    for e in expected {
        let idx = remaining
            .iter()
            .position(|a| {
                (a.x - e.x).abs() <= POS_TOL
                    && (a.y - e.y).abs() <= POS_TOL
                    && (a.diameter - e.diameter).abs() <= POS_TOL
                    && (a.depth - e.depth).abs() <= POS_TOL
            })
            .unwrap_or_else(|| panic!("no match for hole at ({}, {})", e.x, e.y));
        remaining.remove(idx);
    }
}

#[test]
fn through_holes_roundtrip_as_multiset() {
    // Distinct, non-collinear through holes
    let holes = vec![
        vertical(100.0, 50.0, 5.0, 0.0),
        vertical(240.0, 130.0, 8.0, 11.0),
        vertical(410.5, 222.5, 5.0, 0.0),
        vertical(700.0, 480.0, 3.0, 0.0),
    ];
    let part = part_with(holes.clone());

    let text = generate_program(&part);
    let back = parse_program(&text).unwrap();

    assert_eq!(back.dimensions, part.dimensions);
    assert_same_holes(&holes, &back.holes);
    for (e, got) in holes.iter().zip(find_matches(&holes, &back.holes)) {
        assert_eq!(e.kind, got.kind);
        assert_eq!(e.side, got.side);
    }
}

/// Pair each expected hole with its positional match
fn find_matches<'a>(expected: &[Hole], actual: &'a [Hole]) -> Vec<&'a Hole> {
    expected
        .iter()
        .map(|e| {
            actual
                .iter()
                .find(|a| (a.x - e.x).abs() <= POS_TOL && (a.y - e.y).abs() <= POS_TOL)
                .expect("hole present")
        })
        .collect()
}

#[test]
fn even_run_emits_one_record_and_expands_back() {
    let n = 5;
    let holes: Vec<Hole> = (0..n)
        .map(|i| vertical(64.0 + i as f64 * 32.0, 50.0, 5.0, 0.0))
        .collect();
    let part = part_with(holes.clone());

    let text = generate_program(&part);
    assert_eq!(
        text.matches("<102").count(),
        1,
        "evenly spaced collinear holes collapse to one run record"
    );
    assert!(text.contains(&format!("AN=\"{n}\"")));

    let back = parse_program(&text).unwrap();
    assert_same_holes(&holes, &back.holes);
}

#[test]
fn mixed_rows_roundtrip() {
    // Two runs on different width rows plus one loner
    let mut holes: Vec<Hole> = (0..3).map(|i| vertical(100.0 + i as f64 * 32.0, 50.0, 5.0, 0.0)).collect();
    holes.extend((0..4).map(|i| vertical(100.0 + i as f64 * 64.0, 450.0, 8.0, 11.0)));
    holes.push(vertical(777.0, 250.0, 6.0, 0.0));

    let part = part_with(holes.clone());
    let text = generate_program(&part);
    assert_eq!(text.matches("<102").count(), 3);

    let back = parse_program(&text).unwrap();
    assert_same_holes(&holes, &back.holes);
}

#[test]
fn horizontal_holes_roundtrip() {
    let holes = vec![
        Hole {
            x: 0.0,
            y: 150.0,
            z: 9.0,
            diameter: 8.0,
            depth: 22.0,
            kind: HoleKind::Horizontal,
            side: HoleSide::LengthStart,
            flagged: false,
        },
        Hole {
            x: 800.0,
            y: 320.0,
            z: 9.0,
            diameter: 8.0,
            depth: 22.0,
            kind: HoleKind::Horizontal,
            side: HoleSide::LengthEnd,
            flagged: false,
        },
        Hole {
            x: 400.0,
            y: 0.0,
            z: 9.0,
            diameter: 5.0,
            depth: 22.0,
            kind: HoleKind::Horizontal,
            side: HoleSide::WidthStart,
            flagged: false,
        },
    ];
    let part = part_with(holes.clone());

    let text = generate_program(&part);
    assert_eq!(text.matches("<103").count(), 3);

    let back = parse_program(&text).unwrap();
    assert_same_holes(&holes, &back.holes);
    for (e, a) in holes.iter().zip(find_matches(&holes, &back.holes)) {
        assert_eq!(e.side, a.side);
        assert!((e.z - a.z).abs() <= POS_TOL);
    }
}

#[test]
fn comments_roundtrip() {
    let mut part = part_with(vec![]);
    part.comments = vec!["front".to_string(), "grain along length".to_string()];

    let text = generate_program(&part);
    let back = parse_program(&text).unwrap();
    assert_eq!(back.comments, part.comments);
}
