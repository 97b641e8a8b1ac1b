// src/analysis/order.rs

/// 両対数プロットの回帰直線の傾きから収束次数を推定する
///
/// (区間数, 相対誤差) の組について ln(相対誤差) を ln(区間数) に最小二乗で当てはめ、
/// 傾きの符号を反転して返す。誤差がゼロや非有限の点は除外する。
/// 使える点が2つ未満なら `None`。
pub fn observed_order<I>(error_points: I) -> Option<f64>
where
    I: IntoIterator<Item = (usize, f64)>,
{
    let points: Vec<(f64, f64)> = error_points
        .into_iter()
        .filter(|(_, error)| error.is_finite() && *error > 0.0)
        .map(|(intervals, error)| ((intervals as f64).ln(), error.ln()))
        .collect();

    if points.len() < 2 {
        return None;
    }

    let count = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / count;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / count;

    let covariance: f64 = points
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let variance: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();

    if variance == 0.0 {
        return None;
    }
    Some(-covariance / variance)
}
