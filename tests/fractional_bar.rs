mod tests {
    use lumifx::color::{Palette16, Rgb, is_lit};
    use lumifx::strip::Strip;

    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    fn white_strip() -> (Strip, Palette16) {
        let strip = Strip::new(30, 42);
        let pal = Palette16::solid(WHITE);
        (strip, pal)
    }

    #[test]
    fn test_zero_width_touches_exactly_two_pixels() {
        let (mut strip, pal) = white_strip();
        // pixel 7, 5/16ths in
        strip.draw_fractional_bar(7 * 16 + 5, 0, &pal, 0, 255, false, 0);

        let lit: Vec<usize> = strip
            .leds()
            .iter()
            .enumerate()
            .filter(|(_, c)| is_lit(**c))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(lit, vec![7, 8]);
    }

    #[test]
    fn test_edge_brightness_sums_to_full() {
        for frac in 1..16i32 {
            let (mut strip, pal) = white_strip();
            strip.draw_fractional_bar(10 * 16 + frac, 0, &pal, 0, 255, false, 0);
            let leading = strip.leds()[10].r;
            let trailing = strip.leds()[11].r;
            let sum = u16::from(leading) + u16::from(trailing);
            assert!(
                sum.abs_diff(255) <= 1,
                "frac {frac}: {leading} + {trailing} != 255"
            );
        }
    }

    #[test]
    fn test_leading_edge_antialiasing() {
        let (mut strip, pal) = white_strip();
        strip.draw_fractional_bar(5 * 16 + 12, 3, &pal, 0, 255, false, 0);
        // leading pixel carries 255 - frac * 16
        assert_eq!(strip.leds()[5].r, 255 - 12 * 16);
        // interior pixels are at full brightness
        assert_eq!(strip.leds()[6].r, 255);
        assert_eq!(strip.leds()[7].r, 255);
        // trailing pixel gets the complement
        assert_eq!(strip.leds()[8].r, 12 * 16);
    }

    #[test]
    fn test_never_writes_outside_segment() {
        let (mut strip, pal) = white_strip();
        // a wide bar at the very end of the strip
        strip.draw_fractional_bar(29 * 16 + 3, 6, &pal, 0, 255, false, 0);
        assert!(is_lit(strip.leds()[29]));

        let mut strip2 = Strip::new(30, 42);
        strip2.segment_mut().set_range(5, 20);
        strip2.sync_runtime();
        strip2.draw_fractional_bar(19 * 16 + 8, 6, &pal, 0, 255, false, 0);
        for (i, c) in strip2.leds().iter().enumerate() {
            if i > 20 {
                assert!(!is_lit(*c), "pixel {i} written outside the segment");
            }
        }
    }

    #[test]
    fn test_moving_bar_hands_brightness_over() {
        // sliding by one sixteenth shifts brightness between edge pixels
        let (mut strip_a, pal) = white_strip();
        strip_a.draw_fractional_bar(12 * 16 + 4, 2, &pal, 0, 255, false, 0);
        let (mut strip_b, _) = white_strip();
        strip_b.draw_fractional_bar(12 * 16 + 5, 2, &pal, 0, 255, false, 0);
        assert!(strip_b.leds()[12].r < strip_a.leds()[12].r);
        assert!(strip_b.leds()[14].r > strip_a.leds()[14].r);
    }
}
