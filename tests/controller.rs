mod tests {
    use embassy_time::Instant;
    use lumifx::color::{Palette16, PaletteId, Rgb, is_lit};
    use lumifx::fields::FieldId;
    use lumifx::{Mode, OutputDriver, StripController};

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    struct NullDriver;

    impl OutputDriver for NullDriver {
        fn write(&mut self, _colors: &[Rgb]) {}
    }

    fn controller(led_count: u16) -> StripController<NullDriver> {
        StripController::new(led_count, 42, NullDriver)
    }

    #[test]
    fn test_static_solid_red_fills_segment() {
        let mut ctrl = controller(30);
        ctrl.strip_mut()
            .set_current_palette_custom(Palette16::solid(RED));

        ctrl.service(Instant::from_millis(0));

        let strip = ctrl.strip();
        let (start, stop) = (strip.runtime().start, strip.runtime().stop);
        for i in start..=stop {
            assert_eq!(strip.leds()[i as usize], RED, "pixel {i} not pure red");
        }
    }

    #[test]
    fn test_comet_sweeps_full_range_and_stays_inside() {
        let mut ctrl = controller(100);
        ctrl.set_speed(1000);
        ctrl.set_mode(Mode::Comet);

        let stop = ctrl.strip().runtime().stop;
        let mut min_lit = u16::MAX;
        let mut max_lit = 0u16;

        for frame in 0..1000u32 {
            ctrl.service(Instant::from_millis(u64::from(frame) * 20));
            for (i, c) in ctrl.strip().leds().iter().enumerate() {
                if is_lit(*c) {
                    let i = u16::try_from(i).unwrap();
                    assert!(i <= stop, "comet escaped the segment at pixel {i}");
                    min_lit = min_lit.min(i);
                    max_lit = max_lit.max(i);
                }
            }
        }

        // the leading edge must have visited both ends of the segment
        assert_eq!(min_lit, 0);
        assert_eq!(max_lit, stop);
    }

    #[test]
    fn test_sunrise_reaches_full_white() {
        let mut ctrl = controller(20);
        ctrl.field_set(FieldId::SunriseTime, 1);
        ctrl.set_mode(Mode::Sunrise);

        // one simulated minute plus slack, at a 10 ms service cadence
        let mut now = 0u64;
        while now <= 65_000 {
            ctrl.service(Instant::from_millis(now));
            now += 10;
        }

        let strip = ctrl.strip();
        for i in strip.runtime().start..=strip.runtime().stop {
            assert_eq!(strip.leds()[i as usize], WHITE, "pixel {i} not at daylight");
        }
    }

    #[test]
    fn test_mode_switch_during_transition_settles() {
        let mut ctrl = controller(30);
        ctrl.service(Instant::from_millis(0));

        ctrl.set_mode(Mode::Plasma);
        for t in 1..10u64 {
            ctrl.service(Instant::from_millis(t * 20));
        }
        assert!(ctrl.in_transition());

        // interrupt the running transition with a second switch
        ctrl.set_mode(Mode::Comet);
        let mut now = 200u64;
        while ctrl.in_transition() && now < 20_000 {
            ctrl.service(Instant::from_millis(now));
            now += 10;
        }

        assert!(!ctrl.in_transition(), "blend stuck below full weight");
        assert_eq!(ctrl.blend_weight(), 255);
        assert_eq!(ctrl.active_mode(), Mode::Comet);
    }

    #[test]
    fn test_palette_id_snaps_only_after_blend_completes() {
        let mut ctrl = controller(30);
        ctrl.service(Instant::from_millis(0));
        ctrl.set_target_palette(PaletteId::Heat);

        ctrl.service(Instant::from_millis(10));
        assert_eq!(ctrl.strip().current_palette_id(), PaletteId::Rainbow);

        let mut now = 20u64;
        while now < 2_000 {
            ctrl.service(Instant::from_millis(now));
            now += 10;
        }
        assert_eq!(ctrl.strip().current_palette_id(), PaletteId::Heat);
    }

    #[test]
    fn test_speed_clamped_through_field_layer() {
        let mut ctrl = controller(30);
        ctrl.field_set(FieldId::Speed, 4_000_000);
        assert_eq!(ctrl.field_get(FieldId::Speed), 10_000);
        ctrl.field_set(FieldId::Speed, 0);
        assert_eq!(ctrl.field_get(FieldId::Speed), 1);
    }

    #[test]
    fn test_out_of_range_mode_value_is_clamped() {
        let mut ctrl = controller(30);
        ctrl.field_set(FieldId::Mode, 250);
        // the clamp keeps the value inside the registry, never past it
        assert!(ctrl.field_get(FieldId::Mode) < u32::from(Mode::COUNT));
    }

    #[test]
    fn test_restored_snapshot_reproduces_rendering() {
        let mut source = controller(40);
        source.set_mode(Mode::Plasma);
        source.set_speed(2500);
        source.field_set(FieldId::PaletteDistribution, 150);
        let snap = source.snapshot();

        let mut a = controller(40);
        let mut b = controller(40);
        assert!(a.restore_snapshot(&snap));
        assert!(b.restore_snapshot(&snap));

        for t in 0..50u64 {
            a.service(Instant::from_millis(t * 20));
            b.service(Instant::from_millis(t * 20));
        }
        assert_eq!(a.strip().leds(), b.strip().leds());
        assert_eq!(a.active_mode(), Mode::Plasma);
        assert_eq!(a.strip().segment().beat88(), 2500);
    }

    #[test]
    fn test_corrupt_snapshot_is_rejected() {
        let mut ctrl = controller(40);
        let mut snap = ctrl.snapshot();
        snap.beat88 = 9999; // body changed, CRC now stale
        assert!(!ctrl.restore_snapshot(&snap));
    }

    #[test]
    fn test_power_off_decays_to_black() {
        let mut ctrl = controller(30);
        ctrl.strip_mut()
            .set_current_palette_custom(Palette16::solid(RED));
        for t in 0..20u64 {
            ctrl.service(Instant::from_millis(t * 20));
        }
        assert!(ctrl.frame().iter().any(|c| is_lit(*c)));

        ctrl.set_power(false);
        for t in 20..400u64 {
            ctrl.service(Instant::from_millis(t * 20));
        }
        assert!(
            ctrl.frame().iter().all(|c| !is_lit(*c)),
            "frame still lit after power off"
        );
    }
}
