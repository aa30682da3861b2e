//! HUD counters and phase overlays drawn on top of the scene.

use macroquad::{
    color::{Color, WHITE, YELLOW},
    shapes::draw_rectangle,
    text::{draw_text, measure_text},
    window::{screen_height, screen_width},
};
use mystery_escape_core::{LossCause, Phase};
use mystery_escape_rendering::{Hud, Scene};

const FONT_SIZE: f32 = 24.0;
const LINE_HEIGHT: f32 = 28.0;
const MARGIN: f32 = 12.0;

pub(crate) fn draw_hud(scene: &Scene) {
    let lines = hud_lines(&scene.hud);
    let mut y = MARGIN + FONT_SIZE;
    for line in &lines {
        let _ = draw_text(line, MARGIN, y, FONT_SIZE, WHITE);
        y += LINE_HEIGHT;
    }

    if scene.hud.courage_max > 0.0 {
        let width = 200.0;
        let filled = width * (scene.hud.courage / scene.hud.courage_max).clamp(0.0, 1.0);
        let x = screen_width() - width - MARGIN;
        draw_rectangle(x, MARGIN, width, 16.0, Color::new(0.3, 0.0, 0.0, 1.0));
        draw_rectangle(x, MARGIN, filled, 16.0, YELLOW);
    }

    if let Some(riddle) = &scene.hud.riddle {
        let top = screen_height() - 3.0 * LINE_HEIGHT - MARGIN;
        draw_rectangle(
            0.0,
            top - FONT_SIZE,
            screen_width(),
            3.0 * LINE_HEIGHT + MARGIN,
            Color::new(0.0, 0.0, 0.0, 0.7),
        );
        let _ = draw_text(&riddle.prompt, MARGIN, top, FONT_SIZE, WHITE);
        let answer = format!("> {}_", riddle.answer);
        let _ = draw_text(&answer, MARGIN, top + LINE_HEIGHT, FONT_SIZE, YELLOW);
    }
}

pub(crate) fn draw_overlay(scene: &Scene) {
    let Some(lines) = overlay_lines(scene) else {
        return;
    };

    if !matches!(scene.phase, Phase::Menu) {
        draw_rectangle(
            0.0,
            0.0,
            screen_width(),
            screen_height(),
            Color::new(0.0, 0.0, 0.0, 0.6),
        );
    }

    let mut y = screen_height() * 0.4;
    for (index, line) in lines.iter().enumerate() {
        let size = measure_text(line, None, FONT_SIZE as u16, 1.0);
        let x = (screen_width() - size.width) * 0.5;
        let color = if index == 0 { YELLOW } else { WHITE };
        let _ = draw_text(line, x, y, FONT_SIZE, color);
        y += LINE_HEIGHT * 1.5;
    }
}

fn hud_lines(hud: &Hud) -> Vec<String> {
    let seconds = hud.elapsed.as_secs();
    let mut lines = vec![
        format!("Score: {}", hud.score),
        format!("Time: {}:{:02}", seconds / 60, seconds % 60),
        format!("Friends: {}/{}", hud.friends_found, hud.friends_total),
        format!("Traps: {}", hud.traps),
    ];
    if !hud.boost_remaining.is_zero() {
        lines.push(format!("Boost: {:.1}s", hud.boost_remaining.as_secs_f32()));
    }
    if let Some(remaining) = hud.highway_remaining {
        lines.push(format!("Distance: {remaining:.0}"));
    }
    lines
}

fn overlay_lines(scene: &Scene) -> Option<Vec<String>> {
    let lines = match scene.phase {
        Phase::Menu => vec![
            scene.banner.clone(),
            "Press Enter to start".to_owned(),
            "Arrows or WASD to move, Space to use a trap, Esc to pause".to_owned(),
        ],
        Phase::Paused(_) => vec!["Paused".to_owned(), "Press Esc to resume".to_owned()],
        Phase::GameOver(cause) => vec![
            "Game Over".to_owned(),
            loss_message(cause).to_owned(),
            format!("Score: {}", scene.hud.score),
            "Press R to restart or Esc to quit".to_owned(),
        ],
        Phase::Won => vec![
            "You escaped!".to_owned(),
            format!("Final score: {}", scene.hud.score),
            "Press R to play again or Esc to quit".to_owned(),
        ],
        Phase::Active(_) => return None,
    };
    Some(lines)
}

fn loss_message(cause: LossCause) -> &'static str {
    match cause {
        LossCause::CaughtByMonster => "A monster caught you.",
        LossCause::OutOfCourage => "You ran out of courage.",
        LossCause::CaughtByBoss => "The boss caught the van.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use mystery_escape_core::{Activity, Stage};
    use mystery_escape_rendering::Camera;
    use std::time::Duration;

    fn scene(phase: Phase) -> Scene {
        let camera = Camera::new(Vec2::new(800.0, 600.0)).expect("positive viewport");
        let mut scene = Scene::new("Welcome", camera);
        scene.phase = phase;
        scene
    }

    #[test]
    fn running_sessions_have_no_overlay() {
        assert!(overlay_lines(&scene(Phase::Active(Activity::Playing(Stage::Forest)))).is_none());
    }

    #[test]
    fn game_over_overlay_explains_the_loss() {
        let mut scene = scene(Phase::GameOver(LossCause::OutOfCourage));
        scene.hud.score = 180;

        let lines = overlay_lines(&scene).expect("game over overlay");

        assert_eq!(lines[1], "You ran out of courage.");
        assert_eq!(lines[2], "Score: 180");
    }

    #[test]
    fn hud_lists_boost_and_distance_only_when_relevant() {
        let mut hud = Hud {
            score: 50,
            elapsed: Duration::from_secs(75),
            friends_total: 4,
            ..Hud::default()
        };
        assert_eq!(
            hud_lines(&hud),
            vec!["Score: 50", "Time: 1:15", "Friends: 0/4", "Traps: 0"]
        );

        hud.boost_remaining = Duration::from_millis(2_500);
        hud.highway_remaining = Some(4_200.0);
        let lines = hud_lines(&hud);
        assert_eq!(lines[4], "Boost: 2.5s");
        assert_eq!(lines[5], "Distance: 4200");
    }
}
