use super::companies::company_id;
use crate::seeds::{execute_insert, insert_into, seed_record_id};
use crate::steps::SeedContext;
use devseed_orm::metadata::standard::PERSON;
use devseed_orm::OrmResult;
use sqlx::PgConnection;
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
pub struct SeedPerson {
    pub key: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub city: &'static str,
    pub job_title: &'static str,
    pub company: &'static str,
}

impl SeedPerson {
    pub fn id(&self) -> Uuid {
        person_id(self.key)
    }
}

pub fn person_id(key: &str) -> Uuid {
    seed_record_id("person", key)
}

pub const SEED_PEOPLE: &[SeedPerson] = &[
    SeedPerson {
        key: "christoph",
        first_name: "Christoph",
        last_name: "Callisto",
        email: "christoph.calisto@linkedin.com",
        phone: "+33789012345",
        city: "Seattle",
        job_title: "CEO",
        company: "linkedin",
    },
    SeedPerson {
        key: "sylvie",
        first_name: "Sylvie",
        last_name: "Palmer",
        email: "sylvie.palmer@linkedin.com",
        phone: "+33780123456",
        city: "Los Angeles",
        job_title: "CTO",
        company: "linkedin",
    },
    SeedPerson {
        key: "christopher",
        first_name: "Christopher",
        last_name: "Gonzalez",
        email: "christopher.gonzalez@qonto.com",
        phone: "+33789012345",
        city: "Seattle",
        job_title: "Head of Sales",
        company: "qonto",
    },
    SeedPerson {
        key: "ashley",
        first_name: "Ashley",
        last_name: "Parker",
        email: "ashley.parker@qonto.com",
        phone: "+33780123456",
        city: "Los Angeles",
        job_title: "Account Executive",
        company: "qonto",
    },
    SeedPerson {
        key: "nicholas",
        first_name: "Nicholas",
        last_name: "Wright",
        email: "nicholas.wright@microsoft.com",
        phone: "+33781234567",
        city: "Seattle",
        job_title: "Product Manager",
        company: "microsoft",
    },
    SeedPerson {
        key: "isabella",
        first_name: "Isabella",
        last_name: "Scott",
        email: "isabella.scott@microsoft.com",
        phone: "+33782345678",
        city: "New York",
        job_title: "Designer",
        company: "microsoft",
    },
    SeedPerson {
        key: "matthew",
        first_name: "Matthew",
        last_name: "Green",
        email: "matthew.green@microsoft.com",
        phone: "+33783456789",
        city: "Seattle",
        job_title: "Engineer",
        company: "microsoft",
    },
    SeedPerson {
        key: "elizabeth",
        first_name: "Elizabeth",
        last_name: "Baker",
        email: "elizabeth.baker@airbnb.com",
        phone: "+33784567890",
        city: "New York",
        job_title: "Head of Growth",
        company: "airbnb",
    },
    SeedPerson {
        key: "christopher-n",
        first_name: "Christopher",
        last_name: "Nelson",
        email: "christopher.nelson@airbnb.com",
        phone: "+33785678901",
        city: "San Francisco",
        job_title: "Data Analyst",
        company: "airbnb",
    },
    SeedPerson {
        key: "avery",
        first_name: "Avery",
        last_name: "Carter",
        email: "avery.carter@airbnb.com",
        phone: "+33786789012",
        city: "New York",
        job_title: "Recruiter",
        company: "airbnb",
    },
    SeedPerson {
        key: "ethan",
        first_name: "Ethan",
        last_name: "Mitchell",
        email: "ethan.mitchell@google.com",
        phone: "+33787890123",
        city: "Los Angeles",
        job_title: "Solutions Architect",
        company: "google",
    },
    SeedPerson {
        key: "madison",
        first_name: "Madison",
        last_name: "Perez",
        email: "madison.perez@google.com",
        phone: "+33788901234",
        city: "Seattle",
        job_title: "Partnerships",
        company: "google",
    },
];

pub async fn seed_people(conn: &mut PgConnection, ctx: &SeedContext<'_>) -> OrmResult<u64> {
    let mut builder = insert_into(
        ctx.schema,
        &PERSON,
        &[
            "id",
            "nameFirstName",
            "nameLastName",
            "email",
            "phone",
            "city",
            "jobTitle",
            "companyId",
            "position",
        ],
    );
    builder.push_values(SEED_PEOPLE.iter().enumerate(), |mut row, (position, person)| {
        row.push_bind(person.id())
            .push_bind(person.first_name)
            .push_bind(person.last_name)
            .push_bind(person.email)
            .push_bind(person.phone)
            .push_bind(person.city)
            .push_bind(person.job_title)
            .push_bind(company_id(person.company))
            .push_bind(position as f64);
    });
    execute_insert(conn, builder).await
}

#[cfg(test)]
mod tests {
    use super::super::companies::SEED_COMPANIES;
    use super::*;

    #[test]
    fn every_person_works_at_a_seeded_company() {
        for person in SEED_PEOPLE {
            assert!(
                SEED_COMPANIES.iter().any(|c| c.key == person.company),
                "{} works at unknown company {}",
                person.key,
                person.company
            );
        }
    }
}
