mod tests {
    use lumifx::color::{BlendType, ColorCurve, Palette16, Rgb, blend_colors};

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    #[test]
    fn test_blend_colors() {
        assert_eq!(blend_colors(RED, BLUE, 0), RED);
        assert_eq!(blend_colors(RED, BLUE, 255), BLUE);
        assert_eq!(
            blend_colors(RED, BLUE, 128),
            Rgb {
                r: 127,
                g: 0,
                b: 128
            }
        );
        assert_eq!(blend_colors(WHITE, BLACK, 255), BLACK);
        assert_eq!(blend_colors(WHITE, BLACK, 0), WHITE);
    }

    #[test]
    fn test_palette_brightness_zero_is_black() {
        let pal = Palette16::heat();
        for idx in 0..=255u8 {
            assert_eq!(pal.color_at(idx, 0, BlendType::LinearBlend), BLACK);
        }
    }

    #[test]
    fn test_palette_video_floor_keeps_lit_channels() {
        let pal = Palette16::solid(Rgb { r: 40, g: 0, b: 3 });
        let dim = pal.color_at(0, 1, BlendType::LinearBlend);
        // lit channels survive even the dimmest brightness
        assert!(dim.r > 0);
        assert!(dim.b > 0);
        assert_eq!(dim.g, 0);
    }

    #[test]
    fn test_sunrise_curve_endpoints_exact() {
        let curve = ColorCurve::sunrise();
        assert_eq!(curve.color_at(0), BLACK);
        assert_eq!(curve.color_at(1023), WHITE);
        // out of range clamps
        assert_eq!(curve.color_at(-20), BLACK);
        assert_eq!(curve.color_at(2000), WHITE);
    }

    #[test]
    fn test_sunrise_curve_junction_continuity() {
        let curve = ColorCurve::sunrise();
        // the two bezier segments share the mid2 control point exactly
        assert_eq!(curve.color_at(512), Rgb { r: 127, g: 31, b: 0 });
    }

    #[test]
    fn test_sunrise_curve_is_warm_midway() {
        let curve = ColorCurve::sunrise();
        let quarter = curve.color_at(256);
        assert!(quarter.r > quarter.g);
        assert!(quarter.g >= quarter.b);
    }
}
