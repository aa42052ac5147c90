//! Gain application primitives.

/*
Applying a Gain Ramp
====================

A fade is nothing more than multiplying the signal by an envelope, one gain
value per frame:

    output[frame][channel] = input[frame][channel] × gain[frame]

Vocabulary
----------

  frame         One time index across all channels. A stereo frame holds two
                samples, a mono frame one.

  interleaved   Channels alternate inside one slice: L R L R L R ...
                Frame n lives at [n * channels .. (n + 1) * channels].

  planar        One slice per channel: [L L L ...] [R R R ...]
                Frame n is element n of every slice.

  gain          Multiplier in [0.0, 1.0] here. 1.0 leaves the sample alone,
                0.0 silences it.


Why per frame and not per sample?
---------------------------------

Every channel of a frame must get the same gain, otherwise a stereo image
would wobble during the fade. The envelope therefore produces one value per
frame, and these helpers spread it across the channels.


Attenuation in Decibels
-----------------------

    dB = 20 × log₁₀(gain)

    ×1.0   =   0 dB
    ×0.5   =  -6 dB
    ×0.1   = -20 dB
    ×0.0   =  -inf (silence)

A linear gain ramp is therefore not linear in loudness: the last 10% of a
fade-out covers everything from -20 dB down to silence.
*/

/// Multiply a planar channel by per-frame gains (in-place).
#[inline]
pub fn multiply_in_place(signal: &mut [f32], gains: &[f32]) {
    debug_assert_eq!(signal.len(), gains.len());

    for (s, &g) in signal.iter_mut().zip(gains.iter()) {
        *s *= g;
    }
}

/// Multiply an interleaved buffer by per-frame gains (in-place).
///
/// `buffer` must hold exactly `gains.len() * channels` samples.
#[inline]
pub fn apply_frame_gains(buffer: &mut [f32], gains: &[f32], channels: usize) {
    debug_assert_eq!(buffer.len(), gains.len() * channels);

    for (frame, &g) in buffer.chunks_exact_mut(channels).zip(gains.iter()) {
        for sample in frame.iter_mut() {
            *sample *= g;
        }
    }
}

/// Write `src × gain` frame by frame into `dst` (interleaved).
#[inline]
pub fn apply_frame_gains_into(dst: &mut [f32], src: &[f32], gains: &[f32], channels: usize) {
    debug_assert_eq!(dst.len(), src.len());
    debug_assert_eq!(dst.len(), gains.len() * channels);

    for ((out_frame, in_frame), &g) in dst
        .chunks_exact_mut(channels)
        .zip(src.chunks_exact(channels))
        .zip(gains.iter())
    {
        for (o, &s) in out_frame.iter_mut().zip(in_frame.iter()) {
            *o = s * g;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiply_in_place() {
        let mut signal = [1.0, 0.5, -0.5, -1.0];
        let gains = [0.5, 0.5, 0.5, 0.0];
        multiply_in_place(&mut signal, &gains);
        assert_eq!(signal, [0.5, 0.25, -0.25, 0.0]);
    }

    #[test]
    fn test_frame_gains_apply_to_every_channel() {
        // stereo: L R L R L R
        let mut buffer = [1.0, -1.0, 0.5, -0.5, 0.25, -0.25];
        let gains = [0.0, 0.5, 1.0];
        apply_frame_gains(&mut buffer, &gains, 2);
        assert_eq!(buffer, [0.0, -0.0, 0.25, -0.25, 0.25, -0.25]);
    }

    #[test]
    fn test_frame_gains_into() {
        let src = [0.8, 0.4, 0.2];
        let mut dst = [9.0; 3];
        apply_frame_gains_into(&mut dst, &src, &[1.0, 0.5, 0.0], 1);
        assert_eq!(dst, [0.8, 0.2, 0.0]);
    }

    #[test]
    fn test_unity_gain_unchanged() {
        let src = [0.3, -0.7, 0.5, 0.1];
        let mut dst = [0.0; 4];
        apply_frame_gains_into(&mut dst, &src, &[1.0, 1.0], 2);
        assert_eq!(dst, src);
    }
}
