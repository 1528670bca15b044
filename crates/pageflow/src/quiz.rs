/// Account categories shown on the investing quiz's bar chart, in display
/// order.
pub const ACCOUNT_TYPES: [&str; 4] = [
    "Taxable brokerage",
    "Custodial",
    "Retirement Accounts",
    "Education savings",
];

/// The four yes/no questions. `None` means unanswered; the weighting treats
/// an unanswered question as "no".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizAnswers {
    pub is_adult: Option<bool>,
    pub has_job: Option<bool>,
    pub saving_for_college: Option<bool>,
    pub saving_for_retirement: Option<bool>,
}

/// Normalized likelihood for one account category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccountLikelihood {
    pub account: &'static str,
    pub value: f64,
}

/// Computes the normalized account likelihoods for the current answers.
/// Order matches [`ACCOUNT_TYPES`]; values sum to 1.
pub fn account_likelihoods(answers: &QuizAnswers) -> [AccountLikelihood; 4] {
    let is_adult = answers.is_adult.unwrap_or(false);
    let has_job = answers.has_job.unwrap_or(false);
    let saving_for_college = answers.saving_for_college.unwrap_or(false);
    let saving_for_retirement = answers.saving_for_retirement.unwrap_or(false);

    let mut taxable = 1.0_f64;
    let mut custodial = 1.0_f64;
    let mut retirement = 1.0_f64;
    let mut education;

    // Taxable brokerage carries a slight baseline boost.
    taxable += 0.2;

    if has_job {
        taxable += 1.0;
        retirement += 1.0;
    } else {
        taxable = (taxable - 0.5).max(0.0);
        retirement = 0.0;
    }

    // Adults cannot open custodial accounts; minors get a custodial boost.
    if is_adult {
        custodial = 0.0;
        taxable += 0.5;
    } else {
        custodial += 2.0;
    }

    // Saving for college forces education savings to a 60% share of the total.
    if saving_for_college {
        let others = taxable + custodial + retirement;
        education = others * (0.6 / 0.4);
    } else {
        education = 0.0;
    }

    // Applied after the education override, so the forced 60% share drifts
    // slightly below 60% once this boost lands.
    if saving_for_retirement && has_job {
        retirement += 2.0;
    }

    if is_adult {
        custodial = 0.0;
    }

    let total = taxable + custodial + retirement + education;
    let weights = [taxable, custodial, retirement, education];
    let mut out = [AccountLikelihood {
        account: "",
        value: 0.0,
    }; 4];
    for (slot, (account, weight)) in out.iter_mut().zip(ACCOUNT_TYPES.iter().zip(weights)) {
        *slot = AccountLikelihood {
            account,
            value: weight / total,
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(likelihoods: &[AccountLikelihood; 4], account: &str) -> f64 {
        likelihoods
            .iter()
            .find(|entry| entry.account == account)
            .map(|entry| entry.value)
            .unwrap()
    }

    #[test]
    fn likelihoods_always_sum_to_one() {
        let cases = [
            QuizAnswers::default(),
            QuizAnswers {
                is_adult: Some(true),
                has_job: Some(true),
                saving_for_college: Some(true),
                saving_for_retirement: Some(true),
            },
            QuizAnswers {
                is_adult: Some(false),
                has_job: Some(false),
                saving_for_college: Some(true),
                saving_for_retirement: Some(false),
            },
        ];
        for answers in cases {
            let total: f64 = account_likelihoods(&answers)
                .iter()
                .map(|entry| entry.value)
                .sum();
            assert!((total - 1.0).abs() < 1e-9, "{answers:?} summed to {total}");
        }
    }

    #[test]
    fn adults_never_see_custodial() {
        let answers = QuizAnswers {
            is_adult: Some(true),
            has_job: Some(true),
            ..QuizAnswers::default()
        };
        assert_eq!(value_of(&account_likelihoods(&answers), "Custodial"), 0.0);
    }

    #[test]
    fn unemployment_zeroes_retirement() {
        let answers = QuizAnswers {
            has_job: Some(false),
            saving_for_retirement: Some(true),
            ..QuizAnswers::default()
        };
        assert_eq!(
            value_of(&account_likelihoods(&answers), "Retirement Accounts"),
            0.0
        );
    }

    #[test]
    fn college_saving_forces_education_share() {
        let answers = QuizAnswers {
            is_adult: Some(false),
            has_job: Some(false),
            saving_for_college: Some(true),
            saving_for_retirement: Some(false),
        };
        let education = value_of(&account_likelihoods(&answers), "Education savings");
        assert!((education - 0.6).abs() < 1e-9);
    }

    #[test]
    fn unanswered_behaves_like_no() {
        let unanswered = account_likelihoods(&QuizAnswers::default());
        let answered_no = account_likelihoods(&QuizAnswers {
            is_adult: Some(false),
            has_job: Some(false),
            saving_for_college: Some(false),
            saving_for_retirement: Some(false),
        });
        assert_eq!(unanswered, answered_no);
    }
}
