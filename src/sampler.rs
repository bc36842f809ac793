use crate::buffer::WorkingBuffer;
use crate::source::{FrameSource, SourceFrame};

/// Pulls the current frame from `source` into `buf`. Returns false (buffer untouched)
/// when no usable frame is available.
pub fn sample(source: &mut dyn FrameSource, buf: &mut WorkingBuffer) -> bool {
    match source.current_frame() {
        Some(frame) => sample_frame(&frame, buf),
        None => false,
    }
}

/// Nearest-neighbour scale of the whole frame into the buffer, flipped horizontally.
pub fn sample_frame(frame: &SourceFrame<'_>, buf: &mut WorkingBuffer) -> bool {
    if !frame.is_well_formed() {
        return false;
    }
    let bw = buf.width();
    let bh = buf.height();
    if bw == 0 || bh == 0 {
        return false;
    }

    let sw = frame.width;
    let sh = frame.height;
    let cols: Vec<usize> = (0..bw).map(|x| sw - 1 - (x * sw / bw).min(sw - 1)).collect();

    let dst = buf.pixels_mut();
    for y in 0..bh {
        let sy = (y * sh / bh).min(sh - 1);
        let src_row = sy * sw * 4;
        let dst_row = y * bw * 4;
        for (x, &sx) in cols.iter().enumerate() {
            let si = src_row + sx * 4;
            let di = dst_row + x * 4;
            dst[di] = frame.rgba[si];
            dst[di + 1] = frame.rgba[si + 1];
            dst[di + 2] = frame.rgba[si + 2];
            dst[di + 3] = 255;
        }
    }
    true
}
