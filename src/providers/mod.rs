//! # Status line providers.
//!
//! Each provider renders one fragment; [`from_config`] turns [`Config::slots`]
//! into the ordered list the [`Composer`](crate::Composer) walks every cycle.
//!
//! | Slot                  | Provider      | Collaborator                  |
//! |-----------------------|---------------|-------------------------------|
//! | `AlignLeft/Center/Right`, `Separator` | [`Marker`] | none           |
//! | `Memory`              | [`Memory`]    | meminfo file                  |
//! | `Cpu`                 | [`Cpu`]       | cpuinfo file                  |
//! | `Volume`              | [`Volume`]    | [`Amixer`] (`amixer get`)     |
//! | `Music`               | [`Music`]     | MPD over TCP                  |
//! | `Clock`               | [`Clock`]     | local time                    |
//! | `Desktops`            | [`Desktops`]  | [`DesktopStore`](crate::DesktopStore) |

mod clock;
mod cpu;
mod desktops;
mod markers;
mod memory;
mod music;
mod provider;
mod volume;

use std::sync::Arc;

use crate::config::{Config, Slot};

pub use clock::{Clock, format_time};
pub use cpu::{Cpu, parse_mhz};
pub use desktops::Desktops;
pub use markers::Marker;
pub use memory::{MemInfo, Memory};
pub use music::{DEFAULT_HOST, DEFAULT_PORT, MpdSettings, Music, Song};
pub use provider::{Provider, ProviderRef, RenderContext};
pub use volume::{Amixer, Controls, Mixer, MixerReading, Volume};

/// Builds the ordered provider list described by `cfg.slots`.
///
/// Music daemon settings are read from the environment once, here.
pub fn from_config(cfg: &Config) -> Vec<ProviderRef> {
    let deco = &cfg.decorations;
    let mpd = MpdSettings::from_env();

    cfg.slots
        .iter()
        .map(|slot| -> ProviderRef {
            match slot {
                Slot::AlignLeft => Arc::new(Marker::new("align-left", deco.left.clone())),
                Slot::AlignCenter => Arc::new(Marker::new("align-center", deco.center.clone())),
                Slot::AlignRight => Arc::new(Marker::new("align-right", deco.right.clone())),
                Slot::Separator => Arc::new(Marker::new("separator", deco.separator.clone())),
                Slot::Memory => Arc::new(Memory::new(&cfg.meminfo, deco.memory.clone())),
                Slot::Cpu => Arc::new(Cpu::new(&cfg.cpuinfo, deco.cpu.clone())),
                Slot::Volume => Arc::new(Volume::new(
                    Amixer::new(cfg.mixer.clone()),
                    deco.volume.clone(),
                )),
                Slot::Music => Arc::new(Music::new(mpd.clone(), cfg.music_timeout, deco)),
                Slot::Clock => Arc::new(Clock::new(cfg.clock_format.clone(), deco.clock.clone())),
                Slot::Desktops => Arc::new(Desktops::new(deco.desktops.clone())),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_provider_per_slot_in_order() {
        let mut cfg = Config::default();
        cfg.slots = vec![Slot::Clock, Slot::Separator, Slot::Desktops, Slot::Separator];

        let names: Vec<String> = from_config(&cfg)
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, ["clock", "separator", "desktops", "separator"]);
    }
}
