//! INI parsing logic for converting `Ini` → `MosaicFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::{ConfigFileError, ImageSettings, MosaicFile};
use crate::geo::ProjectedRectangle;

/// Prefix of image section names.
pub const IMAGE_SECTION_PREFIX: &str = "image.";

/// Parse an `Ini` object into a `MosaicFile`.
///
/// Starts from defaults and overlays any values found in the INI. Image
/// sections keep their file order.
pub(super) fn parse_ini(ini: &Ini) -> Result<MosaicFile, ConfigFileError> {
    let mut file = MosaicFile::default();

    // [mosaic] section
    if let Some(section) = ini.section(Some("mosaic")) {
        let config = &mut file.mosaic;
        if let Some(v) = parse_key(section, "mosaic", "concurrency", "must be a positive integer")? {
            config.pool.concurrency = positive("mosaic", "concurrency", v)?;
        }
        if let Some(v) = parse_key(
            section,
            "mosaic",
            "image_cache_size",
            "must be a positive integer",
        )? {
            config.pool.image_cache_size = positive("mosaic", "image_cache_size", v)?;
        }
        if let Some(v) = parse_key::<u32>(section, "mosaic", "width", "must be a positive integer")? {
            config.width = positive("mosaic", "width", v as usize)? as u32;
        }
        if let Some(v) = parse_key::<u32>(section, "mosaic", "height", "must be a positive integer")?
        {
            config.height = positive("mosaic", "height", v as usize)? as u32;
        }
        if let Some(v) = parse_key(
            section,
            "mosaic",
            "inset_wait_frames",
            "must be a non-negative integer",
        )? {
            config.inset_wait_frames = v;
        }
        if let Some(v) = section.get("credit") {
            let v = v.trim();
            if !v.is_empty() {
                config.credit = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("show_debug_bounds") {
            config.show_debug_bounds = parse_bool("mosaic", "show_debug_bounds", v)?;
        }
    }

    // [image.<name>] sections
    for (name, section) in ini.iter() {
        let Some(image_name) = name.and_then(|n| n.strip_prefix(IMAGE_SECTION_PREFIX)) else {
            continue;
        };
        file.images.push(parse_image(image_name, section)?);
    }

    Ok(file)
}

fn parse_image(name: &str, section: &Properties) -> Result<ImageSettings, ConfigFileError> {
    let section_name = format!("{IMAGE_SECTION_PREFIX}{name}");
    let required = |key: &str| -> Result<String, ConfigFileError> {
        section
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigFileError::MissingKey {
                section: section_name.clone(),
                key: key.to_string(),
            })
    };
    let coordinate = |key: &str| -> Result<f64, ConfigFileError> {
        let raw = required(key)?;
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ConfigFileError::InvalidValue {
                section: section_name.clone(),
                key: key.to_string(),
                value: raw,
                reason: "must be a finite number".to_string(),
            })
    };

    let url = required("url")?;
    let projection = section
        .get("projection")
        .map(|v| v.trim().to_lowercase())
        .unwrap_or_else(|| "geographic".to_string());
    let rectangle = ProjectedRectangle::new(
        coordinate("west")?,
        coordinate("south")?,
        coordinate("east")?,
        coordinate("north")?,
    );
    if !rectangle.is_valid() {
        return Err(ConfigFileError::InvalidValue {
            section: section_name,
            key: "west/south/east/north".to_string(),
            value: format!(
                "{}, {}, {}, {}",
                rectangle.min_x, rectangle.min_y, rectangle.max_x, rectangle.max_y
            ),
            reason: "requires west < east and south < north".to_string(),
        });
    }

    Ok(ImageSettings {
        name: name.to_string(),
        url,
        projection,
        projected_rectangle: rectangle,
    })
}

fn parse_key<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    section
        .get(key)
        .map(|v| {
            v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                section: section_name.to_string(),
                key: key.to_string(),
                value: v.to_string(),
                reason: reason.to_string(),
            })
        })
        .transpose()
}

fn positive(section: &str, key: &str, value: usize) -> Result<usize, ConfigFileError> {
    if value == 0 {
        return Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}

fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigFileError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mosaic::MosaicConfig;

    fn parse(content: &str) -> Result<MosaicFile, ConfigFileError> {
        parse_ini(&Ini::load_from_str(content).unwrap())
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let file = parse("").unwrap();
        assert_eq!(file.mosaic, MosaicConfig::default());
        assert!(file.images.is_empty());
    }

    #[test]
    fn test_mosaic_section() {
        let file = parse(
            "[mosaic]\nconcurrency = 4\nimage_cache_size = 7\nwidth = 300\nheight = 200\ninset_wait_frames = 0\ncredit = Survey\nshow_debug_bounds = yes\n",
        )
        .unwrap();
        assert_eq!(file.mosaic.pool.concurrency, 4);
        assert_eq!(file.mosaic.pool.image_cache_size, 7);
        assert_eq!((file.mosaic.width, file.mosaic.height), (300, 200));
        assert_eq!(file.mosaic.inset_wait_frames, 0);
        assert_eq!(file.mosaic.credit.as_deref(), Some("Survey"));
        assert!(file.mosaic.show_debug_bounds);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let err = parse("[mosaic]\nconcurrency = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::InvalidValue { ref key, .. } if key == "concurrency"
        ));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let err = parse("[mosaic]\nwidth = wide\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue {
                section,
                key,
                value,
                ..
            } => {
                assert_eq!(section, "mosaic");
                assert_eq!(key, "width");
                assert_eq!(value, "wide");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_images_keep_file_order() {
        let file = parse(
            "[image.b]\nurl = b.png\nwest = 0\nsouth = 0\neast = 1\nnorth = 1\n\
             [other]\nkey = value\n\
             [image.a]\nurl = a.png\nprojection = Web_Mercator\nwest = -1\nsouth = -1\neast = 0\nnorth = 0\n",
        )
        .unwrap();
        let names: Vec<_> = file.images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(file.images[0].projection, "geographic");
        assert_eq!(file.images[1].projection, "web_mercator");
        assert_eq!(
            file.images[1].projected_rectangle,
            ProjectedRectangle::new(-1.0, -1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_missing_url() {
        let err = parse("[image.x]\nwest = 0\nsouth = 0\neast = 1\nnorth = 1\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::MissingKey { ref section, ref key } if section == "image.x" && key == "url"
        ));
    }

    #[test]
    fn test_inverted_rectangle_rejected() {
        let err =
            parse("[image.x]\nurl = x.png\nwest = 1\nsouth = 0\neast = 0\nnorth = 1\n").unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { .. }));
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        let err =
            parse("[image.x]\nurl = x.png\nwest = inf\nsouth = 0\neast = 1\nnorth = 1\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::InvalidValue { ref key, .. } if key == "west"
        ));
    }
}
