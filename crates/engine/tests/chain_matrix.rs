use proptest::prelude::*;
use puyo_core::{Color, Grid, Puyo};
use puyo_engine::{
    apply_gravity, can_place, outgoing_attack, resolve_chains, resolve_connections,
    AttackConfig,
};

fn grid(rows: &[&str]) -> Grid {
    rows.join("\n").parse().expect("fixture grid")
}

/// Six levels of four: col 0 feeds levels 1-4, col 1 feeds 5-6.
fn six_chain() -> Grid {
    grid(&[
        "Y.....", "Y.....", "YR....", "BR....", "BR....", "BP....", "GP....", "GP....",
        "GY....", "RB....", "RGR...", "RRP...",
    ])
}

fn empty_rows(n: usize) -> Vec<&'static str> {
    vec!["......"; n]
}

mod validator {
    use super::*;

    #[test]
    fn test_spawn_above_full_stack_is_allowed() {
        let mut g = Grid::new();
        for y in 0..Grid::HEIGHT {
            g.set(0, y, Some(Color::Red));
        }
        assert!(can_place(
            &g,
            Puyo::new(0, -2, Color::Blue),
            Puyo::new(0, -1, Color::Blue)
        ));
    }

    proptest! {
        #[test]
        fn prop_out_of_columns_rejected(x in -8i8..14, y in -3i8..11) {
            let g = Grid::new();
            let axis = Puyo::new(x, y, Color::Red);
            let child = Puyo::new(x, y + 1, Color::Red);
            let inside = x >= 0 && x < Grid::WIDTH as i8;
            prop_assert_eq!(can_place(&g, axis, child), inside);
        }

        #[test]
        fn prop_below_floor_rejected(x in 0i8..6, y in 12i8..40) {
            let g = Grid::new();
            prop_assert!(!can_place(&g, Puyo::new(x, y, Color::Red), Puyo::new(x, 0, Color::Red)));
            prop_assert!(!can_place(&g, Puyo::new(x, 0, Color::Red), Puyo::new(x, y, Color::Red)));
        }

        #[test]
        fn prop_overlap_rejected(
            filled in prop::collection::vec((0usize..6, 0usize..12), 1..20),
            pick in 0usize..20,
        ) {
            let mut g = Grid::new();
            for &(x, y) in &filled {
                g.set(x, y, Some(Color::Green));
            }
            let (x, y) = filled[pick % filled.len()];
            let hit = Puyo::new(x as i8, y as i8, Color::Red);
            let above = Puyo::new(x as i8, y as i8 - 1, Color::Red);
            prop_assert!(!can_place(&g, hit, above));
            prop_assert!(!can_place(&g, above, hit));
        }
    }
}

mod connectivity {
    use super::*;

    #[test]
    fn test_vertical_four() {
        let mut rows = empty_rows(8);
        rows.extend(["..Y...", "..Y...", "..Y...", "..Y..."]);
        let c = resolve_connections(&grid(&rows));
        assert!(c.any_erased);
        assert_eq!(c.erased_count, 4);
    }

    #[test]
    fn test_staircase_of_four_stays() {
        let mut rows = empty_rows(8);
        rows.extend(["...R..", "..RB..", ".RBG..", "RBGY.."]);
        let c = resolve_connections(&grid(&rows));
        assert!(!c.any_erased);
    }

    #[test]
    fn test_separate_triples_of_same_color_stay() {
        let mut rows = empty_rows(10);
        rows.extend(["......", "RRRGRR"]);
        let c = resolve_connections(&grid(&rows));
        assert!(!c.any_erased);
    }

    proptest! {
        #[test]
        fn prop_survivors_are_in_small_groups(cells in prop::collection::vec(prop::option::of(0usize..3), Grid::CELLS)) {
            let colors = [Color::Red, Color::Green, Color::Blue];
            let mut g = Grid::new();
            for (i, cell) in cells.into_iter().enumerate() {
                g.set(i % Grid::WIDTH, i / Grid::WIDTH, cell.map(|c| colors[c]));
            }
            let pass = resolve_connections(&g);
            prop_assert_eq!(
                g.occupied_count() - pass.grid.occupied_count(),
                pass.erased_count as usize
            );
            // a second pass on the un-compacted result never finds anything
            prop_assert!(!resolve_connections(&pass.grid).any_erased);
        }
    }
}

mod chains {
    use super::*;

    #[test]
    fn test_six_chain_resolves() {
        let outcome = resolve_chains(&six_chain());
        assert_eq!(outcome.chain_count, 6);
        assert_eq!(outcome.total_erased, 24);
        assert!(outcome.all_clear);
    }

    #[test]
    fn test_six_chain_score() {
        let outcome = resolve_chains(&six_chain());
        // 100 * (1 + 2 + 3 + 4 + 5 + 6)
        assert_eq!(outcome.score(&AttackConfig::versus()), 2100);
    }

    #[test]
    fn test_final_grid_is_settled() {
        let mut rows = empty_rows(8);
        rows.extend(["G.....", "RRRR..", "BYBY..", "YBYB.."]);
        let outcome = resolve_chains(&grid(&rows));
        assert_eq!(outcome.chain_count, 1);
        assert_eq!(apply_gravity(&outcome.grid), outcome.grid);
        assert_eq!(outcome.grid.get(0, 9), Some(Color::Green));
    }
}

mod economy {
    use super::*;

    #[test]
    fn test_single_level_sends_nothing() {
        assert_eq!(outgoing_attack(1, 4, false, &AttackConfig::versus()), 0);
    }

    #[test]
    fn test_long_chain_is_positive_without_all_clear() {
        let outcome = resolve_chains(&six_chain());
        let config = AttackConfig::versus();
        let chain_only = outgoing_attack(outcome.chain_count, outcome.total_erased, false, &config);
        assert!(chain_only > 0);
        assert_eq!(outcome.outgoing(&config), chain_only + 30);
    }
}
