use super::*;

#[test]
fn range_stays_within_bounds() {
    let mut rng = seeded_rng(Some(7));
    for _ in 0..1_000 {
        let v = random_range(&mut rng, -20.0, 20.0);
        assert!((-20.0..20.0).contains(&v));
    }
    assert_eq!(random_range(&mut rng, 3.0, 3.0), 3.0);
}

#[test]
fn int_is_inclusive_on_both_ends() {
    let mut rng = seeded_rng(Some(11));
    let mut seen = [false; 3];
    for _ in 0..1_000 {
        let v = random_int(&mut rng, 0, 2);
        assert!((0..=2).contains(&v));
        seen[v as usize] = true;
    }
    assert!(seen.iter().all(|s| *s));
}

#[test]
fn choice_fails_loudly_on_empty_table() {
    let mut rng = seeded_rng(Some(1));
    let empty: [u8; 0] = [];
    let err = random_choice(&mut rng, &empty).unwrap_err();
    assert!(matches!(err, WallError::EmptyChoice(_)));

    let one = ["only"];
    assert_eq!(*random_choice(&mut rng, &one).unwrap(), "only");
}

#[test]
fn bool_respects_extremes() {
    let mut rng = seeded_rng(Some(3));
    for _ in 0..100 {
        assert!(!random_bool(&mut rng, 0.0));
        assert!(random_bool(&mut rng, 1.0));
    }
}

#[test]
fn shuffle_is_a_permutation_and_leaves_input_alone() {
    let mut rng = seeded_rng(Some(5));
    let input: Vec<u32> = (0..50).collect();
    let mut out = shuffle(&mut rng, &input);
    assert_eq!(input, (0..50).collect::<Vec<_>>());
    out.sort_unstable();
    assert_eq!(out, input);
}

#[test]
fn same_seed_same_sequence() {
    let mut a = seeded_rng(Some(42));
    let mut b = seeded_rng(Some(42));
    for _ in 0..10 {
        assert_eq!(random_range(&mut a, 0.0, 1.0), random_range(&mut b, 0.0, 1.0));
    }
}
