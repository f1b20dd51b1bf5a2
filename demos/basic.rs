//! Standalone demo: two pickers sharing presets, bound to one color.

use floem::prelude::*;
use floem::window::WindowConfig;
use floem_prism::{color_picker, ColorModeType, PickerConfig, PickerShapeType, PresetStore, SolidColor};

fn main() {
    env_logger::init();

    let color = RwSignal::new(SolidColor::from_rgb(59, 130, 246));
    let presets = PresetStore::shared();
    for hex in ["EF4444", "F59E0B", "10B981", "3B82F6", "8B5CF6"] {
        match SolidColor::from_hex(hex) {
            Ok(c) => {
                presets.add(c);
            }
            Err(err) => log::warn!("bad preset {hex}: {err}"),
        }
    }

    let config = PickerConfig::default().with_display_old_color(true);

    floem::Application::new()
        .window(
            move |_| {
                h_stack((
                    color_picker(color, config, presets.clone()),
                    color_picker(
                        color,
                        config
                            .with_color_mode(ColorModeType::Okhsl)
                            .with_picker_shape(PickerShapeType::OkhslCircle)
                            .with_deferred_mode(true),
                        presets.clone(),
                    ),
                ))
                .on_event_stop(floem::event::EventListener::WindowClosed, |_| {
                    floem::quit_app()
                })
            },
            Some(
                WindowConfig::default()
                    .size((480.0, 620.0))
                    .title("floem-prism"),
            ),
        )
        .run();
}
