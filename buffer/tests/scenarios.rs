//! End-to-end editing scenarios through the public buffer interface.

use quire_buffer::{Buffer, EditError, Point, Sequence};

fn buffer(text: &str) -> Buffer {
    quire_log::test();
    Buffer::open(Sequence::from(text))
}

#[test]
fn insert_at_start_of_first_line() {
    let mut buf = buffer("hello\nworld");
    buf.replace_range(0, Some(Sequence::from("X"))).unwrap();
    assert_eq!(buf.text().to_string(), "Xhello\nworld");
    assert_eq!(buf.point(), Point::new(0, 1));
}

#[test]
fn delete_at_end_fails_and_keeps_text() {
    let mut buf = buffer("abc");
    buf.goto_point(Point::new(0, 3)).unwrap();
    assert_eq!(buf.replace_range(1, None), Err(EditError::EndOfBuffer));
    assert_eq!(buf.text().to_string(), "abc");
    assert_eq!(buf.point(), Point::new(0, 3));
}

#[test]
fn marker_at_end_of_line_shifts_with_insert() {
    let mut buf = buffer("line1\nline2\n");
    let marker = buf.marker_new(Point::new(0, 5)).unwrap();
    buf.insert_char('X').unwrap();
    assert_eq!(buf.marker_point(marker), Some(Point::new(0, 6)));
}

#[test]
fn markers_below_a_joined_line_move_up() {
    let mut buf = buffer("one\ntwo\nthree");
    let on_two = buf.marker_new(Point::new(1, 2)).unwrap();
    let on_three = buf.marker_new(Point::new(2, 4)).unwrap();

    buf.goto_point(Point::new(0, 3)).unwrap();
    buf.delete_char().unwrap();

    assert_eq!(buf.text().to_string(), "onetwo\nthree");
    assert_eq!(buf.marker_point(on_two), Some(Point::new(0, 5)));
    assert_eq!(buf.marker_point(on_three), Some(Point::new(1, 4)));
}

#[test]
fn markers_below_a_split_line_move_down() {
    let mut buf = buffer("onetwo\nthree");
    let on_two = buf.marker_new(Point::new(0, 4)).unwrap();
    let on_three = buf.marker_new(Point::new(1, 0)).unwrap();

    buf.goto_point(Point::new(0, 3)).unwrap();
    buf.insert_newline().unwrap();

    assert_eq!(buf.text().to_string(), "one\ntwo\nthree");
    assert_eq!(buf.point(), Point::new(1, 0));
    assert_eq!(buf.marker_point(on_two), Some(Point::new(1, 1)));
    assert_eq!(buf.marker_point(on_three), Some(Point::new(2, 0)));
}

#[test]
fn removed_marker_is_no_longer_tracked() {
    let mut buf = buffer("abc");
    let marker = buf.point_marker();
    assert!(buf.remove_marker(marker));
    buf.insert_str("xyz").unwrap();
    assert_eq!(buf.marker_point(marker), None);
    assert!(!buf.remove_marker(marker));
}

#[test]
fn marker_new_rejects_points_outside_text() {
    let mut buf = buffer("abc");
    let point = Point::new(1, 0);
    assert_eq!(buf.marker_new(point), Err(EditError::InvalidPoint { point }));
}

#[test]
fn line_queries_follow_edits() {
    let mut buf = buffer("a\tb\nlonger line");
    assert_eq!(buf.line_count(), 1);
    assert_eq!(buf.line_length(1), Some(11));
    assert_eq!(buf.line_display_width(0), Some(9));

    buf.goto_point(Point::new(1, 6)).unwrap();
    buf.insert_newline().unwrap();
    assert_eq!(buf.line_count(), 2);
    assert_eq!(buf.line_text(2).map(|s| s.to_string()), Some(" line".to_string()));
    assert_eq!(buf.offset_to_point(buf.len()), Some(Point::new(2, 5)));
}
