use mystery_escape_core::{config::GameConfig, CellCoord, Terrain, Tile, Vec2};
use mystery_escape_system_neighborhood::{generate, Neighborhood};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

fn neighborhood(seed: u64) -> Neighborhood {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate(&GameConfig::default(), &mut rng)
}

#[test]
fn border_cells_are_impassable() {
    for seed in 0..8 {
        let neighborhood = neighborhood(seed);
        let grid = neighborhood.tile_grid();
        for (cell, tile) in grid.iter() {
            let on_border = cell.column() == 0
                || cell.row() == 0
                || cell.column() + 1 == grid.columns()
                || cell.row() + 1 == grid.rows();
            if on_border {
                assert_eq!(tile, Tile::Lot, "border cell {cell:?} must stay a lot");
            }
        }
    }
}

#[test]
fn grid_roads_follow_the_lattice() {
    let neighborhood = neighborhood(3);
    let grid = neighborhood.tile_grid();
    for row in [3, 9, 15, 21, 27, 33] {
        for column in 1..grid.columns() - 1 {
            assert_eq!(grid.tile(CellCoord::new(column, row)), Some(Tile::Road));
        }
    }
    for column in [3, 9, 15, 21, 27, 33, 39, 45, 51] {
        for row in 1..grid.rows() - 1 {
            assert_eq!(grid.tile(CellCoord::new(column, row)), Some(Tile::Road));
        }
    }
}

#[test]
fn exit_is_topmost_road_next_to_right_edge() {
    let neighborhood = neighborhood(9);
    let exit = neighborhood.exit();
    assert_eq!(exit, CellCoord::new(58, 3));
    assert!(neighborhood.is_road(neighborhood.exit_bounds().center()));
}

#[test]
fn van_and_player_arrive_on_a_road() {
    for seed in 0..8 {
        let neighborhood = neighborhood(seed);
        let spot = neighborhood.van_spot();
        assert!(neighborhood.is_road(spot.van().origin() + Vec2::splat(1.0)));
        assert!(neighborhood.is_road(spot.player() + Vec2::splat(25.0)));
        assert_eq!(spot.van().origin(), Vec2::new(250.0, 150.0));
    }
}

#[test]
fn spawn_columns_at_the_verge_stay_on_a_road() {
    let mut config = GameConfig::default();
    config.neighborhood.van_column = 58;
    config.neighborhood.player_column = 58;
    assert_eq!(config.validate(), Ok(()));

    for seed in 0..8 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let neighborhood = generate(&config, &mut rng);
        let spot = neighborhood.van_spot();
        assert!(neighborhood.is_road(spot.van().origin() + Vec2::splat(1.0)));
        assert!(neighborhood.is_road(spot.player() + Vec2::splat(25.0)));
    }
}

#[test]
fn houses_sit_on_lots_and_keep_their_distance() {
    let neighborhood = neighborhood(21);
    let grid = neighborhood.tile_grid();
    let houses = neighborhood.houses();
    assert!(!houses.is_empty());
    for (index, house) in houses.iter().enumerate() {
        assert_eq!(grid.tile(*house), Some(Tile::Lot));
        for other in &houses[index + 1..] {
            let far_enough =
                house.column().abs_diff(other.column()) >= 3 || house.row().abs_diff(other.row()) >= 3;
            assert!(far_enough, "{house:?} and {other:?} are too close");
        }
    }
}

#[test]
fn streetlights_stand_on_roads() {
    let neighborhood = neighborhood(5);
    for light in neighborhood.streetlights() {
        assert_eq!(neighborhood.tile_grid().tile(*light), Some(Tile::Road));
    }
}

#[test]
fn same_seed_reproduces_layout() {
    assert_eq!(neighborhood(13), neighborhood(13));
}
