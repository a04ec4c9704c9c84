//! Swagger Petstore checks

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde_json::Value;

use restcheck_core::{ApiResponse, CaseLog, Expectation, PetstoreConfig};

use super::{CaseContext, CaseError, CaseRunner, endpoint, ensure, fail};
use crate::client::ApiClient;
use crate::pets::{generate_pet_name, matches_listing, new_pet, shape_errors};

/// Pet created by `add_a_new_pet` and looked up by the next case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPet {
    pub id: i64,
    pub name: String,
}

pub fn run(runner: &mut CaseRunner<'_>, client: &ApiClient, config: &PetstoreConfig) {
    let ctx = CaseContext {
        client,
        expectation: Expectation::petstore(),
        mode: runner.mode(),
    };
    let mut rng = SmallRng::from_entropy();
    let mut created: Option<CreatedPet> = None;

    runner.case(
        "retrieve_all_available_pets",
        &format!(
            "Find {} pets and look for {} in category {}",
            config.search_status, config.pet_name, config.category_id
        ),
        |log| available_pets(&ctx, log, config),
    );
    runner.case(
        "add_a_new_pet",
        "Add a new available pet with a generated name",
        |log| {
            let name = generate_pet_name(&mut rng);
            created = Some(add_pet(&ctx, log, config, &name)?);
            Ok(())
        },
    );
    runner.case(
        "retrieve_the_created_pet",
        "Look up the pet added by add_a_new_pet by its id",
        |log| match &created {
            Some(pet) => find_pet(&ctx, log, config, pet),
            None => Err(CaseError::Prerequisite(
                "no pet was created by add_a_new_pet".to_string(),
            )),
        },
    );
}

fn available_pets(
    ctx: &CaseContext<'_>,
    log: &mut CaseLog<'_>,
    config: &PetstoreConfig,
) -> Result<(), CaseError> {
    let url = endpoint(&config.base_url, "pet/findByStatus");
    let response = ctx.get_query(log, &url, &[("status", config.search_status.as_str())])?;
    let Some(pets) = response.body.as_ref().and_then(Value::as_array) else {
        return Err(fail(
            log,
            "pet listing",
            "findByStatus did not return a JSON array".to_string(),
        ));
    };
    log.info(format!("{} {} pets listed", pets.len(), config.search_status));

    let (name, category_id) = (&config.pet_name, config.category_id);
    ensure(
        log,
        pets.iter().any(|p| matches_listing(p, name, category_id)),
        "pet listing",
        format!("Pet {name} with category id {category_id} found!"),
        format!("Pet {name} with category id {category_id} was not found!"),
    )
}

fn add_pet(
    ctx: &CaseContext<'_>,
    log: &mut CaseLog<'_>,
    config: &PetstoreConfig,
    name: &str,
) -> Result<CreatedPet, CaseError> {
    let body = serde_json::to_value(new_pet(name)).map_err(|e| CaseError::Fixture(e.to_string()))?;
    let url = endpoint(&config.base_url, "pet");
    let response = ctx.post_json(log, &url, &body)?;

    let id = echoed_id(&response);
    let Some(id) = id.filter(|id| *id > 0) else {
        return Err(fail(
            log,
            "pet id",
            format!("expected a positive integer id, got {}", shown(response.field("id"))),
        ));
    };
    log.pass(format!("Pet created with id {id}"));

    let echoed = response.field("name").and_then(Value::as_str);
    ensure(
        log,
        echoed == Some(name),
        "pet name",
        format!("Name {name} echoed"),
        format!("expected name \"{name}\", got {}", shown(response.field("name"))),
    )?;

    let errors = response.body.as_ref().map(shape_errors).unwrap_or_default();
    if !errors.is_empty() {
        return Err(fail(
            log,
            "pet schema",
            format!("created pet does not match the Pet schema: {}", errors.join("; ")),
        ));
    }
    log.pass("Created pet matches the Pet schema");

    Ok(CreatedPet {
        id,
        name: name.to_string(),
    })
}

fn find_pet(
    ctx: &CaseContext<'_>,
    log: &mut CaseLog<'_>,
    config: &PetstoreConfig,
    pet: &CreatedPet,
) -> Result<(), CaseError> {
    let url = endpoint(&config.base_url, &format!("pet/{}", pet.id));
    let response = ctx.get(log, &url)?;

    ensure(
        log,
        echoed_id(&response) == Some(pet.id),
        "pet id",
        format!("Pet {} retrieved", pet.id),
        format!("expected id {}, got {}", pet.id, shown(response.field("id"))),
    )?;
    ensure(
        log,
        response.field("name").and_then(Value::as_str) == Some(pet.name.as_str()),
        "pet name",
        format!("Pet {} is named {}", pet.id, pet.name),
        format!(
            "expected name \"{}\", got {}",
            pet.name,
            shown(response.field("name"))
        ),
    )
}

fn echoed_id(response: &ApiResponse) -> Option<i64> {
    response.field("id").and_then(Value::as_i64)
}

fn shown(value: Option<&Value>) -> String {
    value.map_or_else(|| "nothing".to_string(), Value::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn echoed_id_must_be_an_integer() {
        assert_eq!(echoed_id(&ApiResponse::json(200, "OK", &json!({"id": 42}))), Some(42));
        assert_eq!(echoed_id(&ApiResponse::json(200, "OK", &json!({"id": "42"}))), None);
        assert_eq!(echoed_id(&ApiResponse::json(200, "OK", &json!([]))), None);
    }

    #[test]
    fn shown_values() {
        assert_eq!(shown(None), "nothing");
        assert_eq!(shown(Some(&json!("rex"))), "\"rex\"");
        assert_eq!(shown(Some(&json!(-1))), "-1");
    }
}
