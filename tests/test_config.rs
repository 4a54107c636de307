mod common;

use changemark::config::parse_color;
use common::*;
use image::Rgb;

#[test]
fn test_defaults() {
    let config = ChangeConfig::default();

    assert_eq!(config.minimum_region_area, 30);
    assert_eq!(config.dilation_kernel_size, 5);
    assert_eq!(config.dilation_iterations, 3);
    assert_eq!(config.box_color, RED);
    assert_eq!(config.box_thickness, 2);
    assert_eq!(config.similarity_window, 7);
    assert_eq!(config.dilation_radius(), 2);
    assert!(config.validate().is_ok());
}

#[test]
fn test_builder_overrides() {
    let config = ChangeConfig::new()
        .with_minimum_region_area(120)
        .with_dilation(7, 1)
        .with_box_color(BLUE)
        .with_box_thickness(4)
        .with_similarity_window(11);

    assert_eq!(config.minimum_region_area, 120);
    assert_eq!(config.dilation_radius(), 3);
    assert_eq!(config.dilation_iterations, 1);
    assert_eq!(config.box_color, BLUE);
    assert_eq!(config.box_thickness, 4);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validation_errors() {
    assert!(ChangeConfig::new().with_dilation(0, 3).validate().is_err());
    assert!(ChangeConfig::new().with_dilation(6, 3).validate().is_err());
    assert!(ChangeConfig::new().with_dilation(513, 3).validate().is_err());
    assert!(ChangeConfig::new().with_dilation(511, 3).validate().is_ok());
    assert!(ChangeConfig::new().with_similarity_window(1).validate().is_err());
    assert!(ChangeConfig::new().with_box_thickness(0).validate().is_err());
}

#[test]
fn test_parse_color_formats() {
    assert_eq!(parse_color("#ff0000"), Ok(Rgb([255, 0, 0])));
    assert_eq!(parse_color("00FF7f"), Ok(Rgb([0, 255, 127])));
    assert_eq!(parse_color("10, 20 ,30"), Ok(Rgb([10, 20, 30])));
}

#[test]
fn test_parse_color_rejects_garbage() {
    assert!(parse_color("red").is_err());
    assert!(parse_color("#ff00").is_err());
    assert!(parse_color("#gg0000").is_err());
    assert!(parse_color("1,2").is_err());
    assert!(parse_color("1,2,300").is_err());
}
