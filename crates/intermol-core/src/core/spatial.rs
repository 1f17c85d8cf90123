//! Uniform-grid spatial index for fixed-radius neighbour queries.
//!
//! Points are binned into cubic cells of edge `2^exp` with a counting sort, so
//! building is linear and every cell's members lie contiguously in one flat
//! array. A query visits only the cells overlapping the query cube and then
//! applies an exact squared-distance test; the grid only prunes candidates.
//!
//! The index is immutable once built and may be shared between readers.

use nalgebra::{Point3, Vector3};
use tracing::debug;

/// Upper bound on the number of grid cells.
pub const MAX_CELLS: usize = 1 << 22;
/// Largest exponent whose cell edge is still a finite `f64`.
const MAX_EXP: u32 = 1023;
/// Per-axis cell count of the clamped fallback grid (`128^3 <= MAX_CELLS`).
const CLAMPED_SIDE: usize = 1 << 7;

fn grid_dims(bb: &Bounds, cell_size: f64) -> [usize; 3] {
    // Float-to-int casts saturate, so huge extents stay at `usize::MAX`.
    let extent = |lo: f64, hi: f64| (((hi - lo) / cell_size).floor().max(0.0) as usize).saturating_add(1);
    [
        extent(bb.min.x, bb.max.x),
        extent(bb.min.y, bb.max.y),
        extent(bb.min.z, bb.max.z),
    ]
}

fn cell_total(dims: [usize; 3]) -> Option<usize> {
    dims[0].checked_mul(dims[1])?.checked_mul(dims[2])
}

/// Axis-aligned bounding box used to lay out the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Bounds {
    /// Smallest box containing every point, or `None` for an empty set.
    pub fn enclosing(points: &[Point3<f64>]) -> Option<Self> {
        let first = points.first()?;
        let (min, max) = points
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.inf(p), hi.sup(p)));
        Some(Self { min, max })
    }
}

#[derive(Debug, Clone)]
pub struct SpatialIndex {
    exp: u32,
    cell_size: f64,
    min: Point3<f64>,
    bounds: [usize; 3],
    /// Cell -> bucket id + 1; zero marks an empty cell.
    grid: Vec<usize>,
    bucket_count: Vec<usize>,
    bucket_offset: Vec<usize>,
    bucket_array: Vec<usize>,
    points: Vec<Point3<f64>>,
}

impl SpatialIndex {
    pub const DEFAULT_EXP: u32 = 3;

    pub fn new(points: Vec<Point3<f64>>) -> Self {
        let bounds = Bounds::enclosing(&points);
        Self::build(points, bounds, Self::DEFAULT_EXP)
    }

    /// Builds over an explicit bounding box. Points outside the box are kept
    /// in the nearest border cell, so queries stay exact.
    pub fn with_bounds(points: Vec<Point3<f64>>, bounds: Bounds) -> Self {
        Self::build(points, Some(bounds), Self::DEFAULT_EXP)
    }

    /// Builds with cell edge `2^exp`. Boxes too wide for `MAX_CELLS` cells
    /// raise the exponent until the grid fits; boxes that never fit (infinite
    /// extents) get a clamped grid whose border cells hold the far points.
    pub fn build(points: Vec<Point3<f64>>, bounds: Option<Bounds>, exp: u32) -> Self {
        let requested_exp = exp;
        let mut exp = exp.min(MAX_EXP);
        let mut cell_size = 2f64.powi(exp as i32);
        let Some(bb) = bounds else {
            return Self {
                exp,
                cell_size,
                min: Point3::origin(),
                bounds: [0; 3],
                grid: Vec::new(),
                bucket_count: Vec::new(),
                bucket_offset: Vec::new(),
                bucket_array: Vec::new(),
                points,
            };
        };

        let fits = |dims: [usize; 3]| cell_total(dims).is_some_and(|n| n <= MAX_CELLS);
        let mut bounds = grid_dims(&bb, cell_size);
        while !fits(bounds) && exp < MAX_EXP {
            exp += 1;
            cell_size *= 2.0;
            bounds = grid_dims(&bb, cell_size);
        }
        if !fits(bounds) {
            bounds = bounds.map(|d| d.min(CLAMPED_SIDE));
        }
        if exp != requested_exp {
            debug!(requested_exp, exp, ?bounds, "Coarsened spatial grid to bound its size.");
        }

        let mut index = Self {
            exp,
            cell_size,
            min: bb.min,
            bounds,
            grid: vec![0; bounds[0] * bounds[1] * bounds[2]],
            bucket_count: Vec::new(),
            bucket_offset: Vec::new(),
            bucket_array: vec![0; points.len()],
            points: Vec::new(),
        };

        let cell_of_point: Vec<usize> = points
            .iter()
            .map(|p| {
                let [x, y, z] = index.cell_coords(p);
                index.linear(x, y, z)
            })
            .collect();

        let mut bucket_total = 0;
        for &cell in &cell_of_point {
            index.grid[cell] += 1;
            if index.grid[cell] == 1 {
                bucket_total += 1;
            }
        }

        index.bucket_count = Vec::with_capacity(bucket_total);
        for slot in index.grid.iter_mut() {
            if *slot > 0 {
                index.bucket_count.push(*slot);
                *slot = index.bucket_count.len();
            }
        }

        index.bucket_offset = vec![0; bucket_total];
        for k in 1..bucket_total {
            index.bucket_offset[k] = index.bucket_offset[k - 1] + index.bucket_count[k - 1];
        }

        let mut fill = vec![0usize; bucket_total];
        for (i, &cell) in cell_of_point.iter().enumerate() {
            let k = index.grid[cell] - 1;
            index.bucket_array[index.bucket_offset[k] + fill[k]] = i;
            fill[k] += 1;
        }

        index.points = points;
        index
    }

    pub fn exp(&self) -> u32 {
        self.exp
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: usize) -> &Point3<f64> {
        &self.points[index]
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    fn axis_cell(&self, value: f64, min: f64, bound: usize) -> usize {
        let cell = ((value - min) / self.cell_size).floor();
        // NaN and negatives saturate to zero in the cast.
        (cell as isize).clamp(0, bound as isize - 1) as usize
    }

    fn cell_coords(&self, p: &Point3<f64>) -> [usize; 3] {
        [
            self.axis_cell(p.x, self.min.x, self.bounds[0]),
            self.axis_cell(p.y, self.min.y, self.bounds[1]),
            self.axis_cell(p.z, self.min.z, self.bounds[2]),
        ]
    }

    #[inline]
    fn linear(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.bounds[1] + y) * self.bounds[2] + z
    }

    /// Calls `visit(index, dist_sq)` for every point within `radius` of `center`.
    ///
    /// Points are visited bucket by bucket, in ascending index order within a bucket.
    pub fn each_within(&self, center: &Point3<f64>, radius: f64, mut visit: impl FnMut(usize, f64)) {
        if self.grid.is_empty() || radius.is_nan() || radius < 0.0 {
            return;
        }
        let r_sq = radius * radius;

        let reach = Vector3::repeat(radius);
        let lo = self.cell_coords(&(*center - reach));
        let hi = self.cell_coords(&(*center + reach));

        for ix in lo[0]..=hi[0] {
            for iy in lo[1]..=hi[1] {
                for iz in lo[2]..=hi[2] {
                    let bucket = self.grid[self.linear(ix, iy, iz)];
                    if bucket == 0 {
                        continue;
                    }
                    let k = bucket - 1;
                    let start = self.bucket_offset[k];
                    let end = start + self.bucket_count[k];
                    for &i in &self.bucket_array[start..end] {
                        let d_sq = (self.points[i] - center).norm_squared();
                        if d_sq <= r_sq {
                            visit(i, d_sq);
                        }
                    }
                }
            }
        }
    }

    /// Indices of all points within `radius` of `center`, in visit order.
    pub fn within(&self, center: &Point3<f64>, radius: f64) -> Vec<usize> {
        let mut result = Vec::new();
        self.each_within(center, radius, |i, _| result.push(i));
        result
    }
}
