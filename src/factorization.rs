//! Reading factorized reads.
//!
//! A factorization file stores one read per line:
//!
//! ```text
//! READ_ID OFFSET|FACTOR FACTOR ...
//! ```
//!
//! The factors are the ordered substrings of an external factorization algorithm,
//! with read borders already removed; the offset is the number of bases removed
//! from the start of the read.
//! Lines without a `|`-delimited factor segment are ignored.


//-----------------------------------------------------------------------------

/// The factorization of a single read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactorRecord {
    /// Identifier of the read.
    pub read_id: String,
    /// Offset of the first factor within the read, in bases.
    pub offset: usize,
    /// The factors, in read order.
    pub factors: Vec<String>,
}

impl FactorRecord {
    /// Returns the fingerprint of the read: the length of each factor, in factor order.
    pub fn fingerprint(&self) -> Vec<usize> {
        self.factors.iter().map(|factor| factor.len()).collect()
    }
}

//-----------------------------------------------------------------------------

/// Parses a line of a factorization file.
///
/// Returns [`None`] for lines that do not split into at least two `|`-delimited
/// segments; such lines are skipped silently by design.
/// Segments after the second are ignored.
/// Returns an error if the read id or the offset is missing, or if the offset
/// is not an unsigned integer.
///
/// # Examples
///
/// ```
/// use kfinger_graph::factorization;
///
/// let record = factorization::parse_record("read1 17|AAAA CCC GG").unwrap().unwrap();
/// assert_eq!(record.read_id, "read1");
/// assert_eq!(record.offset, 17);
/// assert_eq!(record.fingerprint(), vec![4, 3, 2]);
///
/// assert!(factorization::parse_record("no factor segment").unwrap().is_none());
/// ```
pub fn parse_record(line: &str) -> Result<Option<FactorRecord>, String> {
    let mut segments = line.split('|');
    let header = match segments.next() {
        Some(segment) => segment,
        None => return Ok(None),
    };
    let factors = match segments.next() {
        Some(segment) => segment,
        None => return Ok(None),
    };

    let mut fields = header.split(' ').filter(|field| !field.is_empty());
    let read_id = fields.next().ok_or_else(|| {
        format!("Missing read id: {}", line)
    })?;
    let offset = fields.next().ok_or_else(|| {
        format!("Missing offset for read {}", read_id)
    })?;
    let offset = offset.parse::<usize>().map_err(|err| {
        format!("Invalid offset for read {}: {}", read_id, err)
    })?;

    let factors: Vec<String> = factors
        .split(' ')
        .filter(|factor| !factor.is_empty())
        .map(String::from)
        .collect();

    Ok(Some(FactorRecord {
        read_id: String::from(read_id),
        offset,
        factors,
    }))
}

//-----------------------------------------------------------------------------
