//! Fixed-point sample mixer (`s_sound.c`/`i_sound.c`'s shared half): an
//! N-channel pool of currently-playing DMX samples, mixed down to one
//! signed-8-bit PCM block per tic for [`crate::platform::Platform::submit_audio`].
//!
//! DMX's on-disk sample format is a 8-byte header (format tag, sample
//! rate, sample count) followed by raw unsigned-8-bit PCM; this module
//! only deals with already-parsed `&[u8]` sample bodies; header parsing
//! lives in [`crate::wad`] cache lookups the way everything else
//! lump-shaped does.

use alloc::vec::Vec;

pub const NUM_CHANNELS: usize = 8;
pub const MIXER_SAMPLE_RATE: u32 = 11025;

#[derive(Debug, Clone, Copy)]
struct Channel {
    sound_id: u16,
    position: u32,
    length: u32,
    volume: u8,
    /// Stereo separation, `0` = hard left, `255` = hard right, matching
    /// `i_sound.c`'s `stepping[]` pan table shape without the table.
    pan: u8,
    priority: i32,
}

pub struct Mixer {
    channels: [Option<Channel>; NUM_CHANNELS],
    samples: Vec<(u16, Vec<u8>)>,
}

impl Mixer {
    pub fn new() -> Self {
        Mixer { channels: [None; NUM_CHANNELS], samples: Vec::new() }
    }

    /// Registers a decoded DMX sample body under `sound_id` so
    /// `start_channel` can find it later. Grounded on the WAD cache
    /// pattern: callers typically load this once from `Wad::lump_bytes`
    /// and keep the id stable for the lifetime of the level.
    pub fn register_sample(&mut self, sound_id: u16, pcm: Vec<u8>) {
        if let Some(slot) = self.samples.iter_mut().find(|(id, _)| *id == sound_id) {
            slot.1 = pcm;
        } else {
            self.samples.push((sound_id, pcm));
        }
    }

    fn sample_len(&self, sound_id: u16) -> u32 {
        self.samples.iter().find(|(id, _)| *id == sound_id).map(|(_, pcm)| pcm.len() as u32).unwrap_or(0)
    }

    /// `S_StartSound`'s channel-allocation half: find a free channel, or
    /// steal the lowest-priority one if the pool is full and the new
    /// sound outranks it. Returns the channel index used, or `None` if
    /// every channel is busy with something of equal or higher priority.
    pub fn start_channel(&mut self, sound_id: u16, volume: u8, pan: u8, priority: i32) -> Option<usize> {
        if let Some(free) = self.channels.iter().position(|c| c.is_none()) {
            self.channels[free] = Some(Channel { sound_id, position: 0, length: self.sample_len(sound_id), volume, pan, priority });
            return Some(free);
        }

        let (worst, worst_priority) = self
            .channels
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|c| (i, c.priority)))
            .min_by_key(|&(_, p)| p)?;
        if worst_priority > priority {
            return None;
        }
        self.channels[worst] = Some(Channel { sound_id, position: 0, length: self.sample_len(sound_id), volume, pan, priority });
        Some(worst)
    }

    pub fn stop_channel(&mut self, channel: usize) {
        if let Some(slot) = self.channels.get_mut(channel) {
            *slot = None;
        }
    }

    pub fn is_playing(&self, channel: usize) -> bool {
        self.channels.get(channel).map(|c| c.is_some()).unwrap_or(false)
    }

    /// `I_UpdateSound`'s mix loop: sum every active channel's current
    /// sample (scaled by its volume) into `out`, clamping to `i8` range,
    /// and advance each channel's playback position. Channels that run
    /// off the end of their sample are freed.
    pub fn mix(&mut self, out: &mut [i8]) {
        out.fill(0);
        let mut accum = alloc::vec![0i32; out.len()];

        for slot in self.channels.iter_mut() {
            let Some(channel) = slot else { continue };
            let Some((_, pcm)) = self.samples.iter().find(|(id, _)| *id == channel.sound_id) else {
                *slot = None;
                continue;
            };
            for a in accum.iter_mut() {
                if channel.position >= channel.length {
                    break;
                }
                let raw = pcm[channel.position as usize] as i32 - 128;
                *a += raw * channel.volume as i32 / 255;
                channel.position += 1;
            }
            if channel.position >= channel.length {
                *slot = None;
            }
        }

        for (dst, sum) in out.iter_mut().zip(accum.iter()) {
            *dst = (*sum).clamp(i8::MIN as i32, i8::MAX as i32) as i8;
        }
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_channel_uses_a_free_slot() {
        let mut mixer = Mixer::new();
        mixer.register_sample(1, alloc::vec![200; 10]);
        let ch = mixer.start_channel(1, 255, 128, 10).unwrap();
        assert!(mixer.is_playing(ch));
    }

    #[test]
    fn full_pool_steals_lowest_priority_channel() {
        let mut mixer = Mixer::new();
        mixer.register_sample(1, alloc::vec![200; 10]);
        for _ in 0..NUM_CHANNELS {
            mixer.start_channel(1, 255, 128, 5).unwrap();
        }
        let stolen = mixer.start_channel(1, 255, 128, 100);
        assert!(stolen.is_some());
    }

    #[test]
    fn full_pool_refuses_lower_priority_sound() {
        let mut mixer = Mixer::new();
        mixer.register_sample(1, alloc::vec![200; 10]);
        for _ in 0..NUM_CHANNELS {
            mixer.start_channel(1, 255, 128, 100).unwrap();
        }
        let refused = mixer.start_channel(1, 255, 128, 1);
        assert!(refused.is_none());
    }

    #[test]
    fn mix_sums_active_channels_and_advances_position() {
        let mut mixer = Mixer::new();
        mixer.register_sample(1, alloc::vec![255; 4]);
        let ch = mixer.start_channel(1, 255, 128, 10).unwrap();
        let mut out = [0i8; 2];
        mixer.mix(&mut out);
        assert!(out[0] != 0);
        assert!(mixer.is_playing(ch));
    }

    #[test]
    fn channel_frees_itself_once_sample_is_exhausted() {
        let mut mixer = Mixer::new();
        mixer.register_sample(1, alloc::vec![255; 2]);
        let ch = mixer.start_channel(1, 255, 128, 10).unwrap();
        let mut out = [0i8; 4];
        mixer.mix(&mut out);
        assert!(!mixer.is_playing(ch));
    }
}
