//! Row-level access filter.
//!
//! [`filter`] is the single place a [`Dataset`] becomes a [`ScopedView`].
//! It fails closed: no identity, or a scope kind it does not recognise,
//! yields the empty view.

use crate::dataset::{Dataset, Grade, Row, ScopedView};
use crate::error::ScopeError;
use crate::identity::{Scope, UserRecord};
use tracing::debug;

/// Restrict `dataset` to the rows `user` may see.
///
/// Grade scopes require every grade cell to be an integer; a single bad cell
/// fails the whole filter rather than silently hiding rows.
pub fn filter(dataset: &Dataset, user: Option<&UserRecord>) -> Result<ScopedView, ScopeError> {
    let Some(user) = user else {
        debug!("No active identity, returning empty view");
        return Ok(ScopedView::empty());
    };

    let rows: Vec<Row> = match &user.scope {
        Scope::Grade(wanted) => {
            let mut kept = Vec::new();
            for (i, row) in dataset.rows().iter().enumerate() {
                let grade = match &row.grade {
                    Grade::Number(n) => *n,
                    Grade::Text(raw) => {
                        return Err(ScopeError::TypeConversion {
                            row: i + 1,
                            value: raw.clone(),
                        });
                    }
                };
                if grade == *wanted {
                    kept.push(row.clone());
                }
            }
            kept
        }
        Scope::Region(wanted) => dataset
            .rows()
            .iter()
            .filter(|row| row.region == *wanted)
            .cloned()
            .collect(),
        Scope::Unrecognized { kind, .. } => {
            debug!(user = %user.identifier, kind = %kind, "Unrecognized scope kind, returning empty view");
            return Ok(ScopedView::empty());
        }
    };

    debug!(
        user = %user.identifier,
        scope = %user.scope,
        visible = rows.len(),
        total = dataset.len(),
        "Scope filter applied"
    );

    Ok(ScopedView::from_rows(dataset.extra_columns().to_vec(), rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            vec![],
            vec![
                Row::new(8, "North"),
                Row::new(9, "North"),
                Row::new(8, "South"),
            ],
        )
    }

    fn user(scope: Scope) -> UserRecord {
        UserRecord::new("u-test", "Tester", "admin", scope)
    }

    #[test]
    fn grade_scope_keeps_matching_rows() {
        let view = filter(&sample(), Some(&user(Scope::Grade(8)))).unwrap();
        assert_eq!(
            view.rows(),
            &[Row::new(8, "North"), Row::new(8, "South")]
        );
    }

    #[test]
    fn region_scope_keeps_matching_rows() {
        let view = filter(&sample(), Some(&user(Scope::Region("North".into())))).unwrap();
        assert_eq!(
            view.rows(),
            &[Row::new(8, "North"), Row::new(9, "North")]
        );
    }

    #[test]
    fn region_match_is_case_sensitive() {
        let view = filter(&sample(), Some(&user(Scope::Region("north".into())))).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn every_row_satisfies_grade_predicate() {
        let ds = Dataset::new(
            vec![],
            (0..40i64).map(|i| Row::new(i % 5 + 6, if i % 2 == 0 { "East" } else { "West" })).collect(),
        );
        for grade in 4..12 {
            let view = filter(&ds, Some(&user(Scope::Grade(grade)))).unwrap();
            assert!(view.rows().iter().all(|r| r.grade == Grade::Number(grade)));
        }
    }

    #[test]
    fn unrecognized_scope_sees_nothing() {
        let scope = Scope::Unrecognized {
            kind: "district".into(),
            value: "all".into(),
        };
        let view = filter(&sample(), Some(&user(scope))).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn no_user_sees_nothing() {
        let view = filter(&sample(), None).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn filtering_is_deterministic() {
        let ds = sample();
        let u = user(Scope::Grade(8));
        assert_eq!(filter(&ds, Some(&u)).unwrap(), filter(&ds, Some(&u)).unwrap());
    }

    #[test]
    fn source_dataset_is_untouched() {
        let ds = sample();
        let before = ds.clone();
        let _ = filter(&ds, Some(&user(Scope::Grade(9)))).unwrap();
        assert_eq!(ds, before);
    }

    #[test]
    fn non_numeric_grade_fails_grade_scope() {
        let ds = Dataset::new(
            vec![],
            vec![Row::new(8, "North"), Row::with_grade(Grade::parse("eighth"), "North")],
        );
        let err = filter(&ds, Some(&user(Scope::Grade(8)))).unwrap_err();
        assert_eq!(
            err,
            ScopeError::TypeConversion {
                row: 2,
                value: "eighth".into()
            }
        );
    }

    #[test]
    fn non_numeric_grade_does_not_affect_region_scope() {
        let ds = Dataset::new(
            vec![],
            vec![Row::with_grade(Grade::parse("n/a"), "North"), Row::new(9, "South")],
        );
        let view = filter(&ds, Some(&user(Scope::Region("North".into())))).unwrap();
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn view_keeps_extra_columns() {
        let ds = Dataset::new(
            vec!["student".into()],
            vec![Row::new(8, "North").with_extra(vec!["Ravi".into()])],
        );
        let view = filter(&ds, Some(&user(Scope::Grade(8)))).unwrap();
        assert_eq!(view.columns(), vec!["grade", "region", "student"]);
    }
}
