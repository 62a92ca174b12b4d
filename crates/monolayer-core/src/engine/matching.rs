use super::error::AssemblyError;
use crate::core::pattern::Pattern;
use crate::core::surface::site::Site;
use crate::core::utils::geometry::planar_distance_squared;
use nalgebra::Point3;

const TIE_TOLERANCE: f64 = 1e-9;

/// Maps pattern points onto the nearest unoccupied sites and marks them occupied.
///
/// Points are scaled from the unit square by `(lx, ly)` and compared in the xy plane.
/// Equidistant candidates resolve to the lowest site index. Without a pattern every
/// unoccupied site is matched in index order. Returns the matched site indices in
/// pattern order.
pub(crate) fn match_sites(
    sites: &mut [Site],
    pattern: Option<&Pattern>,
    lx: f64,
    ly: f64,
) -> Result<Vec<usize>, AssemblyError> {
    let available = sites.iter().filter(|s| !s.occupied).count();

    let Some(pattern) = pattern else {
        let matched: Vec<usize> = (0..sites.len()).filter(|&i| !sites[i].occupied).collect();
        for &i in &matched {
            sites[i].occupied = true;
        }
        return Ok(matched);
    };

    if pattern.len() > available {
        return Err(AssemblyError::Placement {
            points: pattern.len(),
            available,
        });
    }

    let mut matched = Vec::with_capacity(pattern.len());
    for point in pattern.points() {
        let target = Point3::new(point.x * lx, point.y * ly, 0.0);
        let nearest = nearest_open_site(sites, &target).ok_or_else(|| {
            AssemblyError::Internal("ran out of sites while matching pattern".to_string())
        })?;
        sites[nearest].occupied = true;
        matched.push(nearest);
    }
    Ok(matched)
}

fn nearest_open_site(sites: &[Site], target: &Point3<f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, site) in sites.iter().enumerate() {
        if site.occupied {
            continue;
        }
        let d = planar_distance_squared(&site.position, target).sqrt();
        match best {
            Some((_, best_d)) if d >= best_d - TIE_TOLERANCE => {}
            _ => best = Some((index, d)),
        }
    }
    best.map(|(index, _)| index)
}
