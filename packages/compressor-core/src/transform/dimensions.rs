use crate::transform::params::ResizePolicy;

/// 片方の寸法を合わせたときのもう片方の寸法を計算する
///
/// 四捨五入（0.5 は切り上げ）し、最小1pxを保証する
fn scale_other(src_fixed: u32, src_other: u32, target_fixed: u32) -> u32 {
    let scaled = src_other as f64 * target_fixed as f64 / src_fixed as f64;
    (scaled.round() as u32).max(1)
}

/// 幅のみ指定時の寸法を計算する
fn calculate_width_only(src_w: u32, src_h: u32, target_w: u32) -> (u32, u32) {
    (target_w, scale_other(src_w, src_h, target_w))
}

/// 高さのみ指定時の寸法を計算する
fn calculate_height_only(src_w: u32, src_h: u32, target_h: u32) -> (u32, u32) {
    (scale_other(src_h, src_w, target_h), target_h)
}

/// リサイズ方針から出力寸法を計算する
///
/// 拡大も許可する（指定された寸法に必ず合わせる）
pub fn calculate_target_dimensions(src_w: u32, src_h: u32, policy: ResizePolicy) -> (u32, u32) {
    match policy {
        ResizePolicy::Exact { width, height } => (width, height),
        ResizePolicy::Width(w) => calculate_width_only(src_w, src_h, w),
        ResizePolicy::Height(h) => calculate_height_only(src_w, src_h, h),
    }
}
