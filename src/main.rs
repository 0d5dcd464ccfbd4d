// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use log::{error, info};
use nomnom::{Color, Rect, RenderOptions, Settings, Texture};
use std::error::Error;
use std::thread::sleep;
use std::time::{Duration, Instant};

fn create_sdl2_context(
    settings: &Settings,
) -> Result<(sdl2::Sdl, sdl2::render::WindowCanvas), String> {
    let sdl = sdl2::init()?;
    let video = sdl.video()?;
    let window = video
        .window(
            &settings.window.title,
            settings.window.width,
            settings.window.height,
        )
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;
    let canvas = window
        .into_canvas()
        .accelerated()
        .present_vsync()
        .build()
        .map_err(|e| e.to_string())?;
    Ok((sdl, canvas))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let settings = Settings::load_user_settings();

    let (sdl, mut canvas) = create_sdl2_context(&settings)?;
    let ttf = sdl2::ttf::init().map_err(|e| e.to_string())?;
    let font = ttf.load_font(&settings.text.font_path, settings.text.point_size)?;
    let creator = canvas.texture_creator();
    let mut events = sdl.event_pump()?;

    let mut sprite = Texture::without_font(canvas.window(), &creator);
    sprite.set_color_key(settings.texture.color_key());
    if let Err(e) = sprite.load_from_file(&settings.texture.sprite_path) {
        // The level still runs; the sprite just stays blank.
        error!("Sprite unavailable: {}", e);
    }

    let mut score_label = Texture::new(canvas.window(), &creator, Some(&font));
    let mut hint_label = Texture::new(canvas.window(), &creator, Some(&font));
    hint_label.load_from_rendered_text_wrapped(
        "Eat every dot on the board. Press Escape to quit.",
        Color::WHITE,
        settings.text.wrap_width,
    )?;
    let (screen_w, screen_h) = hint_label.screen_size();
    info!("Window is {}x{}", screen_w, screen_h);

    let frame_clip = Rect::new(0, 0, sprite.width() / 2, sprite.height());
    let target_frame = Duration::from_millis(16); // ~60 FPS max
    let mut score = 0u32;
    let mut shown_score = None;

    'running: loop {
        let frame_start = Instant::now();
        for event in events.poll_iter() {
            match event {
                sdl2::event::Event::Quit { .. }
                | sdl2::event::Event::KeyDown {
                    keycode: Some(sdl2::keyboard::Keycode::Escape),
                    ..
                } => break 'running,
                sdl2::event::Event::KeyDown { .. } => score += 10,
                _ => {}
            }
        }

        if shown_score != Some(score) {
            score_label.load_from_rendered_text(&format!("Score: {}", score), Color::WHITE)?;
            shown_score = Some(score);
        }

        canvas.set_draw_color(sdl2::pixels::Color::RGB(0, 0, 0));
        canvas.clear();

        sprite.render_at(&mut canvas, 0, 0, Some(frame_clip))?;
        sprite.render(
            &mut canvas,
            &RenderOptions::at(screen_w as i32 / 2, screen_h as i32 / 2).with_scale(2.0, 2.0),
        )?;
        score_label.render_at(&mut canvas, 10, 10, None)?;
        hint_label.render_sized(
            &mut canvas,
            10,
            screen_h as i32 - hint_label.height() as i32 - 10,
            hint_label.width(),
            hint_label.height(),
            None,
        )?;

        canvas.present();
        let frame_time = frame_start.elapsed();
        if frame_time < target_frame {
            sleep(target_frame - frame_time);
        }
    }

    Ok(())
}
