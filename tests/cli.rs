use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

fn feigenbrot() -> Command {
    Command::cargo_bin("feigenbrot").unwrap()
}

#[test]
fn renders_a_small_mandelbrot() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("mandelbrot.png");
    feigenbrot()
        .arg("-o")
        .arg(&out)
        .args(&["-t", "1", "mandelbrot", "--width", "40", "--iterations", "30"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Runtime"));
    let image = image::open(&out).unwrap().to_rgb();
    assert_eq!(image.dimensions(), (40, 30));
}

#[test]
fn accepts_negative_ranges_and_colours() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("julia.png");
    feigenbrot()
        .arg("-o")
        .arg(&out)
        .args(&[
            "julia",
            "--width",
            "32",
            "--xrange",
            "-1.5,1.5",
            "--ymin",
            "-1",
            "--seed",
            "-0.8,0.156",
            "--contours",
            "10",
            "--palette",
            "RAINBOW",
            "--set",
            "000000",
        ])
        .assert()
        .success();
    assert!(out.exists());
}

#[test]
fn renders_a_feigenbaum_scan() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("feigenbaum.png");
    feigenbrot()
        .arg("-o")
        .arg(&out)
        .args(&["feigenbaum", "--size", "80x40", "--function", "verhulst", "--krange", "2.5,4.0", "--prange", "0,1"])
        .assert()
        .success();
    let image = image::open(&out).unwrap().to_rgb();
    assert_eq!(image.dimensions(), (80, 40));
}

#[test]
fn renders_attractors() {
    let dir = tempdir().unwrap();
    for family in &["henon", "orbiter"] {
        let out = dir.path().join(format!("{}.png", family));
        feigenbrot()
            .arg("-o")
            .arg(&out)
            .args(&[*family, "--size", "60x40", "--iterations", "200"])
            .assert()
            .success();
        assert!(out.exists());
    }
}

#[test]
fn bad_colours_are_refused() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never.png");
    feigenbrot()
        .arg("-o")
        .arg(&out)
        .args(&["mandelbrot", "--set", "GGGGGG"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter hex value for colour"));
    assert!(!out.exists());
}

#[test]
fn absurd_iterations_are_refused() {
    feigenbrot()
        .args(&["-o", "never.png", "mandelbrot", "--iterations", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Iteration count must be between 2 and 10000"));
}

#[test]
fn too_many_contours_are_refused() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never.png");
    feigenbrot()
        .arg("-o")
        .arg(&out)
        .args(&["mandelbrot", "--iterations", "20", "--contours", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter nr. of contours"));
    assert!(!out.exists());
}

#[test]
fn unwritable_output_fails() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("missing").join("out.png");
    feigenbrot()
        .arg("-o")
        .arg(&out)
        .args(&["newton", "--width", "16"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Couldn't save file"));
}

#[test]
fn hex_palettes_colour_the_contours() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("hex.png");
    feigenbrot()
        .arg("-o")
        .arg(&out)
        .args(&[
            "mandelbrot",
            "--width",
            "40",
            "--iterations",
            "30",
            "--contours",
            "30",
            "--palette",
            "FF0000,00FF00",
        ])
        .assert()
        .success();
    let bytes = image::open(&out).unwrap().to_rgb().into_raw();
    let corner = &bytes[..3];
    assert!(corner == [0xFF, 0, 0] || corner == [0, 0xFF, 0], "{:?}", corner);
}

#[test]
fn malformed_hex_palettes_are_refused() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never.png");
    feigenbrot()
        .arg("-o")
        .arg(&out)
        .args(&["feigenbaum", "--size", "20x10", "--palette", "FF0000,nothex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter hex value for colour"));
    assert!(!out.exists());
}

#[test]
fn oversized_images_are_refused() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never.png");
    for args in &[
        vec!["mandelbrot", "--ratio", "1e30"],
        vec!["mandelbrot", "--height", "18446744073709551615"],
        vec!["henon", "--size", "1000000x1000000"],
    ] {
        feigenbrot()
            .arg("-o")
            .arg(&out)
            .args(args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Could not parse output image size"));
        assert!(!out.exists());
    }
}
