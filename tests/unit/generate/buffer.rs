use super::*;
use crate::foundation::core::Canvas;

fn image(waypoint: usize) -> GeneratedImage {
    GeneratedImage {
        waypoint,
        raster: Raster::filled(Canvas::new(2, 2).unwrap(), [waypoint as u8, 0, 0, 255]),
    }
}

#[test]
fn push_preserves_insertion_order() {
    let mut buf = ImageBuffer::new();
    for wp in [0, 1, 3, 4] {
        buf.push(image(wp)).unwrap();
    }
    let order = buf.iter().map(|g| g.waypoint).collect::<Vec<_>>();
    assert_eq!(order, vec![0, 1, 3, 4]);
    assert_eq!(buf.len(), 4);
    assert_eq!(buf.get(2).unwrap().waypoint, 3);
    assert!(buf.get(4).is_none());
}

#[test]
fn sealed_buffer_rejects_appends() {
    let mut buf = ImageBuffer::with_capacity(2);
    buf.push(image(0)).unwrap();
    buf.seal();
    buf.seal();
    assert!(buf.is_sealed());
    assert!(buf.push(image(1)).is_err());
    assert_eq!(buf.len(), 1);
}

#[test]
fn empty_buffer() {
    let buf = ImageBuffer::new();
    assert!(buf.is_empty());
    assert!(buf.get(0).is_none());
}
