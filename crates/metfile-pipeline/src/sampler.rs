//! Per-situation sampling of wind fields at the evaluation points.

use gral_geometry::PointIndices;

use crate::direction::{wind_direction, wind_speed};
use crate::error::{PipelineError, Result};
use crate::progress::{CancelFlag, ProgressSink};
use crate::source::{FlowFieldSource, StabilitySource};
use crate::stability::StabilityResolver;

/// Wind and stability of one point in one situation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SampledResult {
    pub speed: f32,
    pub direction: f32,
    pub stability: i32,
}

/// Sampled results for every point and situation.
///
/// Indexed `[point][situation]` with 0-based situations. Entries of skipped
/// situations and unsampled points keep the zero default.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleCache {
    situations: usize,
    results: Vec<Vec<SampledResult>>,
}

impl SampleCache {
    pub fn new(points: usize, situations: usize) -> Self {
        Self {
            situations,
            results: vec![vec![SampledResult::default(); situations]; points],
        }
    }

    pub fn point_count(&self) -> usize {
        self.results.len()
    }

    pub fn situation_count(&self) -> usize {
        self.situations
    }

    /// Result for a point and 0-based situation; the default when either is
    /// out of range.
    pub fn get(&self, point: usize, situation: usize) -> SampledResult {
        self.results
            .get(point)
            .and_then(|row| row.get(situation))
            .copied()
            .unwrap_or_default()
    }

    /// All results of one point.
    pub fn point(&self, point: usize) -> &[SampledResult] {
        self.results.get(point).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set(&mut self, point: usize, situation: usize, result: SampledResult) {
        if let Some(slot) = self.results.get_mut(point).and_then(|row| row.get_mut(situation)) {
            *slot = result;
        }
    }
}

/// Samples decoded wind fields for every situation.
pub struct SituationSampler<'a> {
    flow_fields: &'a dyn FlowFieldSource,
    stability: Option<&'a dyn StabilitySource>,
}

impl<'a> SituationSampler<'a> {
    /// Create a sampler. A stability source enables the local stability
    /// override; it is only meaningful when points carry coarse indices.
    pub fn new(
        flow_fields: &'a dyn FlowFieldSource,
        stability: Option<&'a dyn StabilitySource>,
    ) -> Self {
        Self {
            flow_fields,
            stability,
        }
    }

    /// Sample situations `1..=situations` at the given points.
    ///
    /// Returns [`PipelineError::Cancelled`] as soon as the cancel flag is seen
    /// before a situation.
    pub fn sample(
        &self,
        points: &[PointIndices],
        situations: usize,
        cancel: &CancelFlag,
        progress: &dyn ProgressSink,
    ) -> Result<SampleCache> {
        let mut cache = SampleCache::new(points.len(), situations);
        let mut skipped = 0usize;

        for situation in 1..=situations {
            progress.situation_started(situation, situations);
            if cancel.is_cancelled() {
                tracing::info!(situation, "Sampling cancelled");
                return Err(PipelineError::Cancelled);
            }
            if situation % 4 == 0 {
                progress.progress((situation as f64 / situations as f64 * 100.0) as u32);
            }

            if !self.sample_situation(points, situation, &mut cache) {
                skipped += 1;
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, total = situations, "Situations without a flow field");
        }

        Ok(cache)
    }

    /// Sample one situation into `cache`. Returns false when the flow field
    /// could not be loaded.
    fn sample_situation(
        &self,
        points: &[PointIndices],
        situation: usize,
        cache: &mut SampleCache,
    ) -> bool {
        let snapshot = match self.flow_fields.load(situation) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    situation,
                    error = %e,
                    "Failed to load flow field, skipping situation"
                );
                return false;
            }
        };

        let raster = self.stability.and_then(|source| match source.load(situation) {
            Ok(raster) => Some(raster),
            Err(e) => {
                tracing::debug!(
                    situation,
                    error = %e,
                    "No local stability raster, using domain class"
                );
                None
            }
        });
        let resolver = StabilityResolver::with_raster(raster.as_ref());

        let (nii, njj, nkk) = snapshot.extents();
        let default_class = snapshot.stability_class();

        for (index, point) in points.iter().enumerate() {
            let mut result = SampledResult::default();

            if point.within(nii, njj, nkk) {
                // within() guarantees positive indices
                let velocity =
                    snapshot.velocity(point.fine.ix as usize, point.fine.iy as usize, point.iz);
                if let Some((u, v, _w)) = velocity {
                    result.speed = wind_speed(u, v);
                    result.direction = wind_direction(u, v);
                }
            }
            result.stability = resolver.resolve(default_class, point.coarse);

            cache.set(index, situation - 1, result);
        }

        true
    }
}
