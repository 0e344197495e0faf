use super::companies::company_id;
use super::people::person_id;
use crate::seeds::{execute_insert, insert_into, seed_record_id};
use crate::steps::SeedContext;
use chrono::{Duration, Utc};
use devseed_orm::metadata::standard::OPPORTUNITY;
use devseed_orm::OrmResult;
use sqlx::PgConnection;

#[derive(Debug, Clone, Copy)]
pub struct SeedOpportunity {
    pub key: &'static str,
    pub name: &'static str,
    pub amount_micros: i64,
    pub currency_code: &'static str,
    /// Days from the seed run until the expected close
    pub closes_in_days: i64,
    pub probability: &'static str,
    pub stage: &'static str,
    pub point_of_contact: &'static str,
    pub company: &'static str,
}

pub const SEED_OPPORTUNITIES: &[SeedOpportunity] = &[
    SeedOpportunity {
        key: "linkedin-enterprise",
        name: "Enterprise plan",
        amount_micros: 100_000_000_000,
        currency_code: "USD",
        closes_in_days: 30,
        probability: "0.5",
        stage: "NEW",
        point_of_contact: "christoph",
        company: "linkedin",
    },
    SeedOpportunity {
        key: "qonto-expansion",
        name: "Seat expansion",
        amount_micros: 2_000_000_000,
        currency_code: "EUR",
        closes_in_days: 14,
        probability: "0.7",
        stage: "MEETING",
        point_of_contact: "christopher",
        company: "qonto",
    },
    SeedOpportunity {
        key: "microsoft-pilot",
        name: "Pilot",
        amount_micros: 300_000_000,
        currency_code: "USD",
        closes_in_days: 60,
        probability: "0.2",
        stage: "PROPOSAL",
        point_of_contact: "nicholas",
        company: "microsoft",
    },
    SeedOpportunity {
        key: "airbnb-renewal",
        name: "Annual renewal",
        amount_micros: 500_000_000,
        currency_code: "USD",
        closes_in_days: 7,
        probability: "0.9",
        stage: "CUSTOMER",
        point_of_contact: "elizabeth",
        company: "airbnb",
    },
];

pub async fn seed_opportunities(conn: &mut PgConnection, ctx: &SeedContext<'_>) -> OrmResult<u64> {
    let now = Utc::now();
    let mut builder = insert_into(
        ctx.schema,
        &OPPORTUNITY,
        &[
            "id",
            "name",
            "amountAmountMicros",
            "amountCurrencyCode",
            "closeDate",
            "probability",
            "stage",
            "pointOfContactId",
            "companyId",
            "position",
        ],
    );
    builder.push_values(
        SEED_OPPORTUNITIES.iter().enumerate(),
        |mut row, (position, opportunity)| {
            row.push_bind(seed_record_id("opportunity", opportunity.key))
                .push_bind(opportunity.name)
                .push_bind(opportunity.amount_micros)
                .push_bind(opportunity.currency_code)
                .push_bind(now + Duration::days(opportunity.closes_in_days))
                .push_bind(opportunity.probability)
                .push_bind(opportunity.stage)
                .push_bind(person_id(opportunity.point_of_contact))
                .push_bind(company_id(opportunity.company))
                .push_bind(position as f64);
        },
    );
    execute_insert(conn, builder).await
}

#[cfg(test)]
mod tests {
    use super::super::companies::SEED_COMPANIES;
    use super::super::people::SEED_PEOPLE;
    use super::*;

    #[test]
    fn opportunities_reference_seeded_records() {
        for opportunity in SEED_OPPORTUNITIES {
            let contact = SEED_PEOPLE
                .iter()
                .find(|p| p.key == opportunity.point_of_contact)
                .unwrap();
            assert_eq!(contact.company, opportunity.company, "{}", opportunity.key);
            assert!(SEED_COMPANIES.iter().any(|c| c.key == opportunity.company));
        }
    }
}
