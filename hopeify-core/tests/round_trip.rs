use hopeify_core::exif_orientation::{read_orientation, Orientation};
use hopeify_core::palette::{DARK_BLUE, HOPE, LIGHT_BLUE, RED, YELLOW};
use hopeify_core::pipeline::{process_file, PosterJob};
use hopeify_core::posterize::ChannelPolicy;
use image::{GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

/// Horizontal gray ramp from black to white.
fn ramp(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / (width - 1)) as u8;
        Rgb([v, v, v])
    })
}

#[test]
fn jpeg_poster_keeps_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("kitty.png");
    let output = dir.path().join("kitty_hope.jpg");
    ramp(37, 23).save(&input).unwrap();

    let job = PosterJob::new(&input, &output);
    let poster = process_file(&job).unwrap();
    assert_eq!(poster.dimensions(), (37, 23));
    assert!(poster.pixels().all(|p| HOPE.contains(p.0)));

    let saved = image::open(&output).unwrap();
    assert_eq!(saved.dimensions(), (37, 23));
    assert_eq!(
        image::ImageFormat::from_path(&output).unwrap(),
        ImageFormat::Jpeg
    );
}

#[test]
fn png_poster_is_exact() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bands.png");
    let output = dir.path().join("bands_hope.png");

    let mut img = RgbImage::new(4, 1);
    img.put_pixel(0, 0, Rgb([60, 60, 61]));
    img.put_pixel(1, 0, Rgb([61, 60, 61]));
    img.put_pixel(2, 0, Rgb([121, 121, 122]));
    img.put_pixel(3, 0, Rgb([182, 182, 182]));
    img.save(&input).unwrap();

    process_file(&PosterJob::new(&input, &output)).unwrap();

    let saved = image::open(&output).unwrap().to_rgb8();
    assert_eq!(saved.get_pixel(0, 0).0, DARK_BLUE);
    assert_eq!(saved.get_pixel(1, 0).0, RED);
    assert_eq!(saved.get_pixel(2, 0).0, LIGHT_BLUE);
    assert_eq!(saved.get_pixel(3, 0).0, YELLOW);
}

#[test]
fn rgba_input_honours_channel_policy() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("alpha.png");
    RgbaImage::from_pixel(2, 2, Rgba([60, 60, 60, 255]))
        .save(&input)
        .unwrap();

    let color_only = process_file(&PosterJob::new(&input, dir.path().join("a.png"))).unwrap();
    let all = process_file(
        &PosterJob::new(&input, dir.path().join("b.png")).with_policy(ChannelPolicy::AllChannels),
    )
    .unwrap();

    assert_eq!(color_only.get_pixel(1, 1).0, DARK_BLUE);
    assert_eq!(all.get_pixel(1, 1).0, LIGHT_BLUE);
}

#[test]
fn undecodable_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.jpg");
    std::fs::write(&input, b"definitely not a jpeg").unwrap();
    let output = dir.path().join("broken_hope.jpg");

    let result = process_file(&PosterJob::new(&input, &output));
    assert!(matches!(result, Err(hopeify_core::HopeifyError::Image(_))));
    assert!(!output.exists());
}

/// Baseline JPEG of `width`x`height` with an EXIF APP1 segment carrying
/// only Orientation = `tag`, spliced in right after SOI.
fn jpeg_with_orientation(width: u32, height: u32, tag: u16) -> Vec<u8> {
    let mut encoded = Vec::new();
    ramp(width, height)
        .write_to(&mut std::io::Cursor::new(&mut encoded), ImageFormat::Jpeg)
        .unwrap();
    assert_eq!(&encoded[..2], &[0xFFu8, 0xD8]);

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2A"); // big-endian TIFF
    tiff.extend_from_slice(&8u32.to_be_bytes()); // IFD0 offset
    tiff.extend_from_slice(&1u16.to_be_bytes()); // one entry
    tiff.extend_from_slice(&0x0112u16.to_be_bytes()); // Orientation
    tiff.extend_from_slice(&3u16.to_be_bytes()); // SHORT
    tiff.extend_from_slice(&1u32.to_be_bytes()); // count
    tiff.extend_from_slice(&tag.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]); // value padding
    tiff.extend_from_slice(&0u32.to_be_bytes()); // no IFD1

    let mut app1 = vec![0xFF, 0xE1];
    let len = (2 + 6 + tiff.len()) as u16;
    app1.extend_from_slice(&len.to_be_bytes());
    app1.extend_from_slice(b"Exif\x00\x00");
    app1.extend_from_slice(&tiff);

    let mut bytes = encoded[..2].to_vec();
    bytes.extend_from_slice(&app1);
    bytes.extend_from_slice(&encoded[2..]);
    bytes
}

#[test]
fn exif_rotation_swaps_poster_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("phone.jpg");
    let bytes = jpeg_with_orientation(6, 4, 6);
    assert_eq!(read_orientation(&bytes), Some(Orientation::Rotate90));
    std::fs::write(&input, &bytes).unwrap();

    let stored = image::load_from_memory(&bytes).unwrap();
    assert_eq!(stored.dimensions(), (6, 4));

    let output = dir.path().join("phone_hope.png");
    let poster = process_file(&PosterJob::new(&input, &output)).unwrap();
    assert_eq!(poster.dimensions(), (4, 6));
    assert_eq!(image::open(&output).unwrap().dimensions(), (4, 6));
}

#[test]
fn exif_normal_orientation_keeps_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("upright.jpg");
    let bytes = jpeg_with_orientation(6, 4, 1);
    assert_eq!(read_orientation(&bytes), Some(Orientation::Normal));
    std::fs::write(&input, &bytes).unwrap();

    let poster = process_file(&PosterJob::new(&input, dir.path().join("upright_hope.png"))).unwrap();
    assert_eq!(poster.dimensions(), (6, 4));
}
