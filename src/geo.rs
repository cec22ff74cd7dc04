use std::collections::HashMap;

/// Country-name to (latitude, longitude) resolution.
///
/// Implementations degrade gracefully: an unknown or unresolvable name
/// yields `None`, never an error. `resolve` takes `&mut self` so that
/// memoizing implementations fit the same seam as static tables.
pub trait CoordinateLookup: Send + Sync {
    fn resolve(&mut self, name: &str) -> Option<(f64, f64)>;
}

/// Country centroids for the reporters and partners covered by the WITS
/// sheets.
const COORDS: &[(&str, (f64, f64))] = &[
    ("Austria", (47.5162, 14.5501)),
    ("Germany", (51.1657, 10.4515)),
    ("France", (46.6034, 1.8883)),
    ("Italy", (41.8719, 12.5674)),
    ("Poland", (51.9194, 19.1451)),
    ("Slovenia", (46.1512, 14.9955)),
    ("Czech Republic", (49.8175, 15.4730)),
    ("Hungary", (47.1625, 19.5033)),
    ("Netherlands", (52.1326, 5.2913)),
    ("Belgium", (50.5039, 4.4699)),
    ("Switzerland", (46.8182, 8.2275)),
    ("Spain", (40.4637, -3.7492)),
    ("Slovakia", (48.6690, 19.6990)),
    ("Croatia", (45.1000, 15.2000)),
    ("Romania", (45.9432, 24.9668)),
    ("Bulgaria", (42.7339, 25.4858)),
    ("Sweden", (60.1282, 18.6435)),
    ("Denmark", (56.2639, 9.5018)),
    ("Greece", (39.0742, 21.8243)),
    ("Portugal", (39.3999, -8.2245)),
    ("Finland", (61.9241, 25.7482)),
    ("Norway", (60.4720, 8.4689)),
    ("Ireland", (53.4129, -8.2439)),
    ("Estonia", (58.5953, 25.0136)),
    ("Latvia", (56.8796, 24.6032)),
    ("Lithuania", (55.1694, 23.8813)),
    ("United States", (37.0902, -95.7129)),
    ("Japan", (36.2048, 138.2529)),
    ("China", (35.8617, 104.1954)),
    ("India", (20.5937, 78.9629)),
    ("Brazil", (-14.2350, -51.9253)),
    ("Mexico", (23.6345, -102.5528)),
    ("Canada", (56.1304, -106.3468)),
    ("South Korea", (35.9078, 127.7669)),
    ("Australia", (-25.2744, 133.7751)),
    ("Russia", (61.5240, 105.3188)),
    ("Turkey", (38.9637, 35.2433)),
    ("Ukraine", (48.3794, 31.1656)),
    ("Egypt", (26.8206, 30.8025)),
    ("South Africa", (-30.5595, 22.9375)),
    ("Singapore", (1.3521, 103.8198)),
    ("Thailand", (15.8700, 100.9925)),
    ("Indonesia", (-0.7893, 113.9213)),
    ("Malaysia", (4.2105, 101.9758)),
];

/// Built-in static coordinate table.
pub struct StaticCoordinates {
    table: HashMap<&'static str, (f64, f64)>,
}

impl StaticCoordinates {
    pub fn new() -> Self {
        Self {
            table: COORDS.iter().copied().collect(),
        }
    }
}

impl Default for StaticCoordinates {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateLookup for StaticCoordinates {
    fn resolve(&mut self, name: &str) -> Option<(f64, f64)> {
        self.table.get(name).copied()
    }
}

/// Per-name memoization wrapper for lookups that are expensive to call,
/// e.g. a live geocoder.
///
/// Policy: never evict. Entries live as long as the wrapper does; misses
/// are cached too, so a failing name hits the inner lookup exactly once.
pub struct MemoizedLookup<L> {
    inner: L,
    cache: HashMap<String, Option<(f64, f64)>>,
}

impl<L: CoordinateLookup> MemoizedLookup<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
        }
    }

    /// Number of memoized names, hits and misses both counted.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

impl<L: CoordinateLookup> CoordinateLookup for MemoizedLookup<L> {
    fn resolve(&mut self, name: &str) -> Option<(f64, f64)> {
        if let Some(hit) = self.cache.get(name) {
            return *hit;
        }
        let resolved = self.inner.resolve(name);
        self.cache.insert(name.to_string(), resolved);
        resolved
    }
}
