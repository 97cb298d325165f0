use crate::state::ViewportState;

/// Style properties the host applies to the active layer's image element:
/// scale by `zoom`, then translate by `offset`.
///
/// The offset is not multiplied by the zoom, so a pointer drag of N pixels
/// moves the image N pixels at any zoom level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageStyle {
    pub transform: String,
    pub left: String,
    pub top: String,
    pub cursor: &'static str,
}

impl ImageStyle {
    pub fn from_state(state: &ViewportState) -> Self {
        Self {
            transform: format!("scale({})", state.zoom),
            left: format!("{}px", state.offset.x),
            top: format!("{}px", state.offset.y),
            cursor: if state.is_panning { "grabbing" } else { "grab" },
        }
    }

    /// `(property, value)` pairs in application order.
    pub fn properties(&self) -> [(&'static str, &str); 4] {
        [
            ("transform", self.transform.as_str()),
            ("left", self.left.as_str()),
            ("top", self.top.as_str()),
            ("cursor", self.cursor),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::Vec2;
    use pretty_assertions::assert_eq;

    fn state(zoom: f64, x: f64, y: f64, is_panning: bool) -> ViewportState {
        ViewportState {
            zoom,
            offset: Vec2::new(x, y),
            is_panning,
            ..ViewportState::default()
        }
    }

    #[test]
    fn style_formats_css_values() {
        let style = ImageStyle::from_state(&state(1.5, 5.0, -12.5, true));
        assert_eq!(
            style,
            ImageStyle {
                transform: "scale(1.5)".to_string(),
                left: "5px".to_string(),
                top: "-12.5px".to_string(),
                cursor: "grabbing",
            }
        );
    }

    #[test]
    fn idle_style_uses_grab_cursor() {
        let style = ImageStyle::from_state(&ViewportState::default());
        assert_eq!(style.transform, "scale(1)");
        assert_eq!(style.left, "0px");
        assert_eq!(style.properties()[3], ("cursor", "grab"));
    }
}
