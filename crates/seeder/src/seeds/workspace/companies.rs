use crate::seeds::{execute_insert, insert_into, seed_record_id};
use crate::steps::SeedContext;
use devseed_orm::metadata::standard::COMPANY;
use devseed_orm::OrmResult;
use sqlx::PgConnection;
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
pub struct SeedCompany {
    pub key: &'static str,
    pub name: &'static str,
    pub domain_name: &'static str,
    pub address: &'static str,
    pub employees: i32,
    pub ideal_customer_profile: bool,
}

impl SeedCompany {
    pub fn id(&self) -> Uuid {
        company_id(self.key)
    }

    fn linkedin_url(&self) -> String {
        format!("https://www.linkedin.com/company/{}", self.key)
    }
}

pub fn company_id(key: &str) -> Uuid {
    seed_record_id("company", key)
}

const fn company(
    key: &'static str,
    name: &'static str,
    domain_name: &'static str,
    address: &'static str,
    employees: i32,
    ideal_customer_profile: bool,
) -> SeedCompany {
    SeedCompany {
        key,
        name,
        domain_name,
        address,
        employees,
        ideal_customer_profile,
    }
}

pub const SEED_COMPANIES: &[SeedCompany] = &[
    company("linkedin", "Linkedin", "linkedin.com", "1000 W Maude Ave, Sunnyvale", 20000, true),
    company("facebook", "Facebook", "facebook.com", "1 Hacker Way, Menlo Park", 70000, false),
    company("qonto", "Qonto", "qonto.com", "18 rue de Navarin, Paris", 1400, true),
    company("microsoft", "Microsoft", "microsoft.com", "1 Microsoft Way, Redmond", 220000, false),
    company("airbnb", "Airbnb", "airbnb.com", "888 Brannan St, San Francisco", 6800, true),
    company("google", "Google", "google.com", "1600 Amphitheatre Pkwy, Mountain View", 180000, false),
    company("netflix", "Netflix", "netflix.com", "121 Albright Way, Los Gatos", 12800, false),
    company("libeo", "Libeo", "libeo.io", "26 rue de Berri, Paris", 150, true),
    company("claap", "Claap", "claap.io", "8 rue de Sentier, Paris", 50, true),
    company("hasura", "Hasura", "hasura.io", "548 Market St, San Francisco", 300, false),
    company("wework", "Wework", "wework.com", "75 Rockefeller Plaza, New York", 3500, false),
    company("samsung", "Samsung", "samsung.com", "129 Samsung-ro, Suwon", 270000, false),
    company("algolia", "Algolia", "algolia.com", "5 rue de Charonne, Paris", 700, true),
];

pub async fn seed_companies(conn: &mut PgConnection, ctx: &SeedContext<'_>) -> OrmResult<u64> {
    let mut builder = insert_into(
        ctx.schema,
        &COMPANY,
        &[
            "id",
            "name",
            "domainName",
            "address",
            "employees",
            "linkedinLinkUrl",
            "idealCustomerProfile",
            "position",
        ],
    );
    builder.push_values(SEED_COMPANIES.iter().enumerate(), |mut row, (position, company)| {
        row.push_bind(company.id())
            .push_bind(company.name)
            .push_bind(company.domain_name)
            .push_bind(company.address)
            .push_bind(company.employees)
            .push_bind(company.linkedin_url())
            .push_bind(company.ideal_customer_profile)
            .push_bind(position as f64);
    });
    execute_insert(conn, builder).await
}
