use crate::prompt::Prompter;
use crate::record::{Algorithm, OtpKind, PartialRecord};
use crate::{reconcile, uri};
use anyhow::Result;

/// Поле, которое контроллер может спросить у пользователя.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Kind,
    Issuer,
    Account,
    Secret,
    Algorithm,
    Digits,
    Period,
    Counter,
}

/// Один шаг опроса.
pub struct Step {
    pub field: Field,
    /// Skip the step unless this holds for the record as known so far
    /// (decoded values plus earlier answers).
    pub when: Option<fn(&PartialRecord) -> bool>,
}

impl Step {
    fn always(field: Field) -> Step {
        Step { field, when: None }
    }

    fn when(field: Field, pred: fn(&PartialRecord) -> bool) -> Step {
        Step {
            field,
            when: Some(pred),
        }
    }
}

/// Собрать план опроса: спрашиваем только то, чего не хватает.
///
/// A scanned artifact is trusted for everything except issuer and account,
/// which are always confirmed. Without a scan every field is collected,
/// with period/counter gated on the kind resolved by then.
pub fn plan(decoded: &PartialRecord, scanned: bool) -> Vec<Step> {
    let mut steps = Vec::new();

    if decoded.kind.is_none() {
        steps.push(Step::always(Field::Kind));
    }
    steps.push(Step::always(Field::Issuer));
    steps.push(Step::always(Field::Account));

    if !scanned {
        steps.push(Step::always(Field::Secret));
        steps.push(Step::always(Field::Algorithm));
        steps.push(Step::always(Field::Digits));
        steps.push(Step::when(Field::Period, |r| {
            r.kind == Some(OtpKind::Totp)
        }));
        steps.push(Step::when(Field::Counter, |r| {
            r.kind == Some(OtpKind::Hotp)
        }));
    }

    steps
}

/// Полный проход: вопросы, слияние, канонический URI.
pub fn run(
    decoded: PartialRecord,
    scanned: bool,
    prompter: &mut dyn Prompter,
) -> Result<String> {
    let answers = collect(&decoded, scanned, prompter)?;
    let record = reconcile::merge(decoded, answers)?;
    Ok(uri::encode(&record))
}

/// Прогнать план один раз и вернуть ответы как частичную запись.
pub fn collect(
    decoded: &PartialRecord,
    scanned: bool,
    prompter: &mut dyn Prompter,
) -> Result<PartialRecord> {
    let mut answers = PartialRecord::default();

    for step in plan(decoded, scanned) {
        let known = known_so_far(decoded, &answers);
        if let Some(when) = step.when {
            if !when(&known) {
                continue;
            }
        }
        ask(step.field, &known, &mut answers, prompter)?;
    }

    Ok(answers)
}

/// Запись, какой мы её знаем на текущем шаге: ответы поверх QR-кода,
/// без нормализации.
fn known_so_far(decoded: &PartialRecord, answers: &PartialRecord) -> PartialRecord {
    PartialRecord {
        kind: answers.kind.or(decoded.kind),
        issuer: answers.issuer.clone().or_else(|| decoded.issuer.clone()),
        account: answers.account.clone().or_else(|| decoded.account.clone()),
        secret: answers.secret.clone().or_else(|| decoded.secret.clone()),
        algorithm: answers.algorithm.or(decoded.algorithm),
        digits: answers.digits.or(decoded.digits),
        period: answers.period.or(decoded.period),
        counter: answers.counter.or(decoded.counter),
        extra: decoded.extra.clone(),
    }
}

fn ask(
    field: Field,
    known: &PartialRecord,
    answers: &mut PartialRecord,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    match field {
        Field::Kind => {
            let idx = prompter.select(
                "Choose the type of OTP",
                &["Time-based OTP", "HMAC-based OTP"],
                0,
            )?;
            answers.kind = Some(if idx == 1 { OtpKind::Hotp } else { OtpKind::Totp });
        }
        Field::Issuer => {
            let value = prompter.text(
                "Enter the name of a provider or service",
                known.issuer.as_deref(),
            )?;
            answers.issuer = Some(value);
        }
        Field::Account => {
            let value = prompter.text("Enter your account", known.account.as_deref())?;
            answers.account = Some(value);
        }
        Field::Secret => {
            let value = prompter.secret("Enter an OTP secret")?;
            answers.secret = Some(value);
        }
        Field::Algorithm => {
            let idx = prompter.select(
                "Choose an algorithm",
                &[
                    "Skip and let app to choose default (usually SHA1)",
                    "SHA1",
                    "SHA256",
                    "SHA512",
                ],
                0,
            )?;
            answers.algorithm = match idx {
                1 => Some(Algorithm::Sha1),
                2 => Some(Algorithm::Sha256),
                3 => Some(Algorithm::Sha512),
                _ => None,
            };
        }
        Field::Digits => {
            let idx = prompter.select("Choose the length of passcode", &["6", "8"], 0)?;
            answers.digits = Some(if idx == 1 { 8 } else { 6 });
        }
        Field::Period => {
            let value = prompter.number(
                "Define a period that a TOTP code will be valid for (in seconds)",
                Some(30),
            )?;
            answers.period = Some(value);
        }
        Field::Counter => {
            let value = prompter.number("Define the initial counter value", None)?;
            answers.counter = Some(value);
        }
    }
    Ok(())
}
