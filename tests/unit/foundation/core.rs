use super::*;

#[test]
fn checked_rejects_negative_and_non_finite() {
    assert!(BoardDimensions::checked(-1.0, 10.0).is_err());
    assert!(BoardDimensions::checked(10.0, f64::NAN).is_err());
    assert_eq!(
        BoardDimensions::checked(800.0, 600.0).unwrap(),
        BoardDimensions::new(800.0, 600.0)
    );
}

#[test]
fn from_viewport_subtracts_chrome_and_saturates() {
    let b = BoardDimensions::from_viewport(Size::new(1280.0, 720.0), Size::new(60.0, 120.0));
    assert_eq!(b, BoardDimensions::new(1220.0, 600.0));

    let tiny = BoardDimensions::from_viewport(Size::new(10.0, 10.0), Size::new(60.0, 120.0));
    assert_eq!(tiny, BoardDimensions::new(0.0, 0.0));
}

#[test]
fn rect_is_origin_anchored() {
    let r = BoardDimensions::new(100.0, 50.0).to_rect();
    assert_eq!(r, Rect::new(0.0, 0.0, 100.0, 50.0));
}
