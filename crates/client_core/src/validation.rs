//! Turns raw form text into typed requests. Pure: no I/O, no state.

use shared::{
    domain::FilterKind,
    protocol::{FilterRequest, FilterSpec},
};

use crate::{
    error::ValidationError,
    form::{Field, FormSource},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolParameters {
    pub total_numbers: i64,
    pub choose: i64,
}

pub fn parse_integer(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Splits on commas and keeps the tokens that parse as integers.
pub fn parse_number_list(raw: &str) -> Vec<i64> {
    raw.split(',').filter_map(parse_integer).collect()
}

fn integer_field<F: FormSource + ?Sized>(form: &F, field: Field) -> Option<i64> {
    form.value(field).as_deref().and_then(parse_integer)
}

fn integer_pair<F: FormSource + ?Sized>(
    form: &F,
    low: Field,
    high: Field,
    err: ValidationError,
) -> Result<(i64, i64), ValidationError> {
    match (integer_field(form, low), integer_field(form, high)) {
        (Some(low), Some(high)) => Ok((low, high)),
        _ => Err(err),
    }
}

fn number_list<F: FormSource + ?Sized>(
    form: &F,
    field: Field,
    err: ValidationError,
) -> Result<Vec<i64>, ValidationError> {
    let numbers = parse_number_list(form.value(field).as_deref().unwrap_or_default());
    if numbers.is_empty() {
        return Err(err);
    }
    Ok(numbers)
}

fn positive_field<F: FormSource + ?Sized>(
    form: &F,
    field: Field,
    err: ValidationError,
) -> Result<i64, ValidationError> {
    match integer_field(form, field) {
        Some(value) if value >= 1 => Ok(value),
        _ => Err(err),
    }
}

pub fn read_pool<F: FormSource + ?Sized>(form: &F) -> Option<PoolParameters> {
    Some(PoolParameters {
        total_numbers: integer_field(form, Field::TotalNumbers)?,
        choose: integer_field(form, Field::Choose)?,
    })
}

/// Reads only the fields that belong to `kind`.
pub fn build_filter<F: FormSource + ?Sized>(
    kind: FilterKind,
    form: &F,
) -> Result<FilterSpec, ValidationError> {
    let spec = match kind {
        FilterKind::Sum => {
            let (min_sum, max_sum) =
                integer_pair(form, Field::MinSum, Field::MaxSum, ValidationError::SumRange)?;
            FilterSpec::Sum { min_sum, max_sum }
        }
        FilterKind::EvenOdd => {
            let (min_even, max_even) = integer_pair(
                form,
                Field::MinEven,
                Field::MaxEven,
                ValidationError::EvenOddRange,
            )?;
            FilterSpec::EvenOdd { min_even, max_even }
        }
        FilterKind::Distance => {
            let (min_distance, max_distance) = integer_pair(
                form,
                Field::MinDistance,
                Field::MaxDistance,
                ValidationError::DistanceRange,
            )?;
            FilterSpec::Distance {
                min_distance,
                max_distance,
            }
        }
        FilterKind::Include => FilterSpec::Include {
            numbers: number_list(form, Field::IncludeNumbers, ValidationError::IncludeNumbers)?,
        },
        FilterKind::Exclude => FilterSpec::Exclude {
            numbers: number_list(form, Field::ExcludeNumbers, ValidationError::ExcludeNumbers)?,
        },
        FilterKind::Random => FilterSpec::Random {
            count: positive_field(form, Field::RandomCount, ValidationError::RandomCount)?,
        },
        FilterKind::Consecutive => FilterSpec::Consecutive {
            max_consecutive: positive_field(
                form,
                Field::MaxConsecutive,
                ValidationError::ConsecutiveLimit,
            )?,
        },
    };
    Ok(spec)
}

pub fn generation_request<F: FormSource + ?Sized>(
    form: &F,
) -> Result<FilterRequest, ValidationError> {
    let pool = read_pool(form).ok_or(ValidationError::InvalidParameters)?;
    Ok(FilterRequest::unfiltered(pool.total_numbers, pool.choose))
}

/// Pool parameters are checked before the kind, so an unknown kind with an
/// empty pool still reports the missing pool.
pub fn filter_request<F: FormSource + ?Sized>(
    kind: &str,
    form: &F,
) -> Result<FilterRequest, ValidationError> {
    let pool = read_pool(form).ok_or(ValidationError::MissingParameters)?;
    let kind: FilterKind = kind
        .parse()
        .map_err(|_| ValidationError::UnknownKind(kind.trim().to_string()))?;
    let spec = build_filter(kind, form)?;
    Ok(FilterRequest::filtered(pool.total_numbers, pool.choose, spec))
}
