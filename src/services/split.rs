//! Share computation for expenses
//!
//! Divides an expense total among participants by split type. Whatever the
//! type, the resulting shares add up to the total to the cent.

use crate::error::{SplitError, SplitResult};
use crate::models::{MemberId, Money, Share, SplitType};

/// Basis points in 100%
pub const FULL_PERCENT_BP: i64 = 10_000;

/// How to divide an expense among its participants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitRequest {
    /// Equal shares among the listed members
    Equal(Vec<MemberId>),
    /// Exact amount per member
    Exact(Vec<(MemberId, Money)>),
    /// Percentage per member, in basis points (33.33% = 3333)
    Percentage(Vec<(MemberId, i64)>),
}

impl SplitRequest {
    pub fn split_type(&self) -> SplitType {
        match self {
            Self::Equal(_) => SplitType::Equal,
            Self::Exact(_) => SplitType::Exact,
            Self::Percentage(_) => SplitType::Percentage,
        }
    }

    pub fn participants(&self) -> Vec<MemberId> {
        match self {
            Self::Equal(members) => members.clone(),
            Self::Exact(shares) => shares.iter().map(|(id, _)| *id).collect(),
            Self::Percentage(shares) => shares.iter().map(|(id, _)| *id).collect(),
        }
    }
}

/// Parse a percentage such as "33.33" or "12.5%" into basis points
pub fn parse_percentage(s: &str) -> SplitResult<i64> {
    let trimmed = s.trim().trim_end_matches('%');
    // Percentages have the same two-decimal shape as money amounts
    let value = Money::parse(trimmed)
        .map_err(|_| SplitError::Validation(format!("Invalid percentage: {}", s)))?;
    if value.is_negative() {
        return Err(SplitError::Validation(format!(
            "Percentage cannot be negative: {}",
            s
        )));
    }
    Ok(value.cents())
}

/// Compute each participant's share of `total`
pub fn compute_shares(total: Money, request: &SplitRequest) -> SplitResult<Vec<Share>> {
    if !total.is_positive() {
        return Err(SplitError::Validation(
            "Expense amount must be positive".into(),
        ));
    }

    let participants = request.participants();
    if participants.is_empty() {
        return Err(SplitError::Validation(
            "Expense must be split among at least one member".into(),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    if let Some(dup) = participants.iter().find(|id| !seen.insert(**id)) {
        return Err(SplitError::Validation(format!(
            "Member {} appears more than once in the split",
            dup
        )));
    }

    match request {
        SplitRequest::Equal(members) => Ok(split_equal(total, members)),
        SplitRequest::Exact(shares) => split_exact(total, shares),
        SplitRequest::Percentage(shares) => split_percentage(total, shares),
    }
}

/// Equal shares; the first `total % n` members pay one extra cent
fn split_equal(total: Money, members: &[MemberId]) -> Vec<Share> {
    let n = members.len() as i64;
    let base = total.cents() / n;
    let remainder = total.cents() % n;

    members
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let extra = if (i as i64) < remainder { 1 } else { 0 };
            Share::new(*id, Money::from_cents(base + extra))
        })
        .collect()
}

fn split_exact(total: Money, shares: &[(MemberId, Money)]) -> SplitResult<Vec<Share>> {
    if shares.iter().any(|(_, amount)| amount.is_negative()) {
        return Err(SplitError::Validation(
            "Exact shares cannot be negative".into(),
        ));
    }

    let sum: Money = shares.iter().map(|(_, amount)| *amount).sum();
    if sum != total {
        return Err(SplitError::Validation(format!(
            "Exact shares add up to {} but the expense is {}",
            sum, total
        )));
    }

    Ok(shares
        .iter()
        .map(|(id, amount)| Share::new(*id, *amount))
        .collect())
}

/// Percentage shares, floored to the cent, with leftover cents handed out by
/// largest fractional remainder (earlier participants first on ties)
fn split_percentage(total: Money, shares: &[(MemberId, i64)]) -> SplitResult<Vec<Share>> {
    if shares.iter().any(|(_, bp)| *bp < 0) {
        return Err(SplitError::Validation(
            "Percentages cannot be negative".into(),
        ));
    }

    let sum_bp: i64 = shares.iter().map(|(_, bp)| *bp).sum();
    if sum_bp != FULL_PERCENT_BP {
        return Err(SplitError::Validation(format!(
            "Percentages add up to {}% instead of 100%",
            Money::from_cents(sum_bp).to_decimal_string()
        )));
    }

    let total_cents = i128::from(total.cents());
    let mut amounts: Vec<i64> = Vec::with_capacity(shares.len());
    let mut remainders: Vec<(usize, i128)> = Vec::with_capacity(shares.len());

    for (i, (_, bp)) in shares.iter().enumerate() {
        let exact = total_cents * i128::from(*bp);
        let floor = exact / i128::from(FULL_PERCENT_BP);
        amounts.push(floor as i64);
        remainders.push((i, exact % i128::from(FULL_PERCENT_BP)));
    }

    let allocated: i64 = amounts.iter().sum();
    let leftover = (total.cents() - allocated) as usize;

    remainders.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (index, _) in remainders.into_iter().take(leftover) {
        amounts[index] += 1;
    }

    Ok(shares
        .iter()
        .zip(amounts)
        .map(|((id, _), cents)| Share::new(*id, Money::from_cents(cents)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(n: usize) -> Vec<MemberId> {
        let mut ids: Vec<MemberId> = (0..n).map(|_| MemberId::new()).collect();
        ids.sort();
        ids
    }

    fn cents(shares: &[Share]) -> Vec<i64> {
        shares.iter().map(|s| s.amount.cents()).collect()
    }

    #[test]
    fn test_equal_split_even() {
        let ids = members(4);
        let shares = compute_shares(Money::from_cents(10000), &SplitRequest::Equal(ids)).unwrap();
        assert_eq!(cents(&shares), vec![2500, 2500, 2500, 2500]);
    }

    #[test]
    fn test_equal_split_remainder_goes_to_first() {
        let ids = members(3);
        let shares = compute_shares(Money::from_cents(10000), &SplitRequest::Equal(ids)).unwrap();
        assert_eq!(cents(&shares), vec![3334, 3333, 3333]);
    }

    #[test]
    fn test_exact_split() {
        let ids = members(2);
        let request = SplitRequest::Exact(vec![
            (ids[0], Money::from_cents(700)),
            (ids[1], Money::from_cents(300)),
        ]);
        let shares = compute_shares(Money::from_cents(1000), &request).unwrap();
        assert_eq!(cents(&shares), vec![700, 300]);
    }

    #[test]
    fn test_exact_split_must_match_total() {
        let ids = members(2);
        let request = SplitRequest::Exact(vec![
            (ids[0], Money::from_cents(700)),
            (ids[1], Money::from_cents(200)),
        ]);
        let err = compute_shares(Money::from_cents(1000), &request).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_percentage_split_thirds() {
        let ids = members(3);
        let request =
            SplitRequest::Percentage(vec![(ids[0], 3333), (ids[1], 3333), (ids[2], 3334)]);
        let shares = compute_shares(Money::from_cents(10000), &request).unwrap();
        assert_eq!(cents(&shares), vec![3333, 3333, 3334]);
    }

    #[test]
    fn test_percentage_split_distributes_leftover_cents() {
        let ids = members(3);
        let request =
            SplitRequest::Percentage(vec![(ids[0], 5000), (ids[1], 2500), (ids[2], 2500)]);
        // 0.99 -> 49.5 / 24.75 / 24.75 cents; the two .75 remainders win
        let shares = compute_shares(Money::from_cents(99), &request).unwrap();
        assert_eq!(cents(&shares), vec![49, 25, 25]);
        let total: Money = shares.iter().map(|s| s.amount).sum();
        assert_eq!(total, Money::from_cents(99));
    }

    #[test]
    fn test_percentage_must_total_100() {
        let ids = members(2);
        let request = SplitRequest::Percentage(vec![(ids[0], 5000), (ids[1], 4000)]);
        let err = compute_shares(Money::from_cents(1000), &request).unwrap_err();
        assert!(err.to_string().contains("90.00%"));
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(compute_shares(Money::from_cents(100), &SplitRequest::Equal(vec![])).is_err());

        let id = MemberId::new();
        let err =
            compute_shares(Money::from_cents(100), &SplitRequest::Equal(vec![id, id])).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_rejects_non_positive_total() {
        let ids = members(2);
        assert!(compute_shares(Money::zero(), &SplitRequest::Equal(ids.clone())).is_err());
        assert!(compute_shares(Money::from_cents(-100), &SplitRequest::Equal(ids)).is_err());
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("33.33").unwrap(), 3333);
        assert_eq!(parse_percentage("50%").unwrap(), 5000);
        assert_eq!(parse_percentage("12.5").unwrap(), 1250);
        assert!(parse_percentage("-5").is_err());
        assert!(parse_percentage("half").is_err());
    }
}
