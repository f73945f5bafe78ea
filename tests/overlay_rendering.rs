use histmatch::{
    render_overlay, BoundingBox, OverlayRenderer, OverlayStyle, Pixel, RgbImage,
};

fn gradient(width: usize, height: usize) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Pixel::new(x as u8, y as u8, 77)).unwrap()
}

#[test]
fn paints_exactly_the_box() {
    let img = gradient(7, 5);
    let bbox = BoundingBox::new(2, 1, 3, 2).unwrap();
    let out = render_overlay(&img, &bbox);
    assert_eq!((out.width(), out.height()), (7, 5));
    for y in 0..5 {
        for x in 0..7 {
            let expected = if bbox.contains(x, y) {
                Pixel::RED
            } else {
                img.get(x, y).unwrap()
            };
            assert_eq!(out.get(x, y).unwrap(), expected, "at ({x}, {y})");
        }
    }
}

#[test]
fn rendering_twice_equals_rendering_once() {
    let img = gradient(6, 6);
    let bbox = BoundingBox::new(1, 2, 4, 3).unwrap();
    let once = render_overlay(&img, &bbox);
    let twice = render_overlay(&once, &bbox);
    assert_eq!(once, twice);
}

#[test]
fn box_past_the_edges_is_clipped() {
    let img = gradient(4, 3);
    let bbox = BoundingBox::new(2, 1, 10, 10).unwrap();
    let mut out = img.clone();
    let painted = OverlayRenderer::default().render_in_place(&mut out, &bbox);
    assert_eq!(painted, 4);
    assert_eq!(out.pixel_count(), img.pixel_count());
    for y in 0..3 {
        for x in 0..4 {
            let inside = x >= 2 && y >= 1;
            let expected = if inside { Pixel::RED } else { img.get(x, y).unwrap() };
            assert_eq!(out.get(x, y).unwrap(), expected);
        }
    }
}

#[test]
fn custom_color_is_used() {
    let img = RgbImage::filled(3, 3, Pixel::BLACK).unwrap();
    let renderer = OverlayRenderer::new(OverlayStyle {
        color: Pixel::GREEN,
    });
    let out = renderer.render(&img, &BoundingBox::new(1, 1, 1, 1).unwrap());
    assert_eq!(out.get(1, 1), Some(Pixel::GREEN));
    assert_eq!(out.pixels().iter().filter(|p| **p == Pixel::GREEN).count(), 1);
    assert_eq!(renderer.style().color, Pixel::GREEN);
}

#[test]
fn source_image_is_untouched() {
    let img = gradient(3, 3);
    let before = img.clone();
    let _ = render_overlay(&img, &BoundingBox::new(0, 0, 3, 3).unwrap());
    assert_eq!(img, before);
}
