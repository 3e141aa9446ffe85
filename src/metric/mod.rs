//! The inbound data model: a `MetricRecord` is what the host's collection
//! framework hands the sink once per collection tick. Records are built up
//! front and treated as immutable once handed over; the sink only ever
//! borrows them.

mod tagmap;

pub use self::tagmap::TagMap;

/// A single named numeric sample inside a `MetricRecord`.
///
/// Names may contain spaces -- the encoder replaces them with underscores on
/// the way out, since the wire format disallows unescaped spaces in the
/// identifier segment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Name of the sample.
    pub name: String,
    /// The sampled value.
    pub value: f64,
}

/// A named group of samples produced at one collection tick.
///
/// All samples in a record share the record's tag set. A record with zero
/// samples is legal and renders to nothing.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MetricRecord {
    /// The metrics context that produced this record, e.g. "dfs".
    pub context: String,
    /// Name of the record within its context.
    pub name: String,
    tags: TagMap,
    metrics: Vec<Metric>,
}

impl MetricRecord {
    /// Make a new record with no tags and no samples.
    ///
    /// # Examples
    ///
    /// ```
    /// use influx_sink::metric::MetricRecord;
    ///
    /// let record = MetricRecord::new("dfs", "namenode");
    ///
    /// assert_eq!(record.context, "dfs");
    /// assert_eq!(record.name, "namenode");
    /// assert!(record.tags().is_empty());
    /// assert!(record.metrics().is_empty());
    /// ```
    pub fn new<S>(context: S, name: S) -> MetricRecord
    where
        S: Into<String>,
    {
        MetricRecord {
            context: context.into(),
            name: name.into(),
            tags: TagMap::default(),
            metrics: Vec::new(),
        }
    }

    /// Overlay a specific name / value pair in self's tags
    ///
    /// This inserts a name / value pair into the record's tag map. If the
    /// name was already present the value will be replaced, else it will be
    /// inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use influx_sink::metric::MetricRecord;
    ///
    /// let record = MetricRecord::new("dfs", "namenode")
    ///     .overlay_tag("host", "nn-1")
    ///     .overlay_tag("host", "nn-2");
    ///
    /// assert_eq!(Some("nn-2"), record.tags().get("host"));
    /// ```
    pub fn overlay_tag<S>(mut self, name: S, val: S) -> MetricRecord
    where
        S: Into<String>,
    {
        self.tags.insert(name.into(), val.into());
        self
    }

    /// Append a named sample to the record.
    ///
    /// Samples keep their append order; the encoder renders one line per
    /// sample in that order.
    ///
    /// # Examples
    ///
    /// ```
    /// use influx_sink::metric::MetricRecord;
    ///
    /// let record = MetricRecord::new("jvm", "memory")
    ///     .sample("heap used", 12.7)
    ///     .sample("heap max", 512.0);
    ///
    /// assert_eq!(2, record.metrics().len());
    /// assert_eq!("heap used", record.metrics()[0].name);
    /// ```
    pub fn sample<S>(mut self, name: S, value: f64) -> MetricRecord
    where
        S: Into<String>,
    {
        self.metrics.push(Metric {
            name: name.into(),
            value: value,
        });
        self
    }

    /// The record's dimensional tags, in name order.
    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    /// The record's samples, in append order.
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }
}
