//! dog.ceo checks

use serde_json::Value;

use restcheck_core::{ApiResponse, CaseLog, DogConfig, Expectation, MESSAGE_KEY};

use super::{CaseContext, CaseError, CaseRunner, endpoint, ensure, fail};
use crate::client::ApiClient;

pub fn run(runner: &mut CaseRunner<'_>, client: &ApiClient, config: &DogConfig) {
    let ctx = CaseContext {
        client,
        expectation: Expectation::dog_api(),
        mode: runner.mode(),
    };

    runner.case(
        "random_breed_search_is_successful",
        &format!("Get a random image of the {} breed", config.random_breed),
        |log| random_breed_image(&ctx, log, config),
    );
    runner.case(
        "bulldog_is_on_the_list_of_breeds",
        &format!("Check that {} is on the list of all breeds", config.listed_breed),
        |log| breed_is_listed(&ctx, log, config),
    );
    runner.case(
        "retrieve_all_sub_breeds_and_their_images",
        &format!(
            "List the sub-breeds of {} and fetch the images of each",
            config.sub_breed_parent
        ),
        |log| sub_breed_images(&ctx, log, config),
    );
}

fn random_breed_image(
    ctx: &CaseContext<'_>,
    log: &mut CaseLog<'_>,
    config: &DogConfig,
) -> Result<(), CaseError> {
    let url = endpoint(
        &config.base_url,
        &format!("breed/{}/images/random", config.random_breed),
    );
    let response = ctx.get(log, &url)?;
    let image = response
        .field(MESSAGE_KEY)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());
    match image {
        Some(image) => {
            log.pass(format!("Random image: {image}"));
            Ok(())
        }
        None => Err(fail(
            log,
            "random image",
            format!("'{MESSAGE_KEY}' is not an image URL"),
        )),
    }
}

fn breed_is_listed(
    ctx: &CaseContext<'_>,
    log: &mut CaseLog<'_>,
    config: &DogConfig,
) -> Result<(), CaseError> {
    let url = endpoint(&config.base_url, "breeds/list/all");
    let response = ctx.get(log, &url)?;
    let breed = &config.listed_breed;
    ensure(
        log,
        breed_listed(&response, breed),
        "breed list",
        format!("{breed} is on the list of breeds"),
        format!("{breed} is not on the list of breeds"),
    )
}

fn sub_breed_images(
    ctx: &CaseContext<'_>,
    log: &mut CaseLog<'_>,
    config: &DogConfig,
) -> Result<(), CaseError> {
    let breed = &config.sub_breed_parent;
    let url = endpoint(&config.base_url, &format!("breed/{breed}/list"));
    let response = ctx.get(log, &url)?;
    let Some(sub_breeds) = string_list(&response) else {
        return Err(fail(
            log,
            "sub-breeds",
            format!("'{MESSAGE_KEY}' is not a list of {breed} sub-breeds"),
        ));
    };
    log.info(format!("{breed} has {} sub-breeds", sub_breeds.len()));

    for sub in &sub_breeds {
        let url = endpoint(&config.base_url, &format!("breed/{breed}/{sub}/images"));
        let response = ctx.get(log, &url)?;
        match string_list(&response) {
            Some(images) => {
                log.pass(format!("{sub} {breed}: {} images", images.len()));
                for image in &images {
                    log.info(format!("image src = {image}"));
                }
            }
            None => {
                return Err(fail(
                    log,
                    "sub-breed images",
                    format!("'{MESSAGE_KEY}' for {sub} {breed} is not a list of images"),
                ));
            }
        }
    }
    Ok(())
}

/// Whether the `message` mapping of `breeds/list/all` has `breed` as a key.
#[must_use]
pub fn breed_listed(response: &ApiResponse, breed: &str) -> bool {
    response
        .field(MESSAGE_KEY)
        .and_then(Value::as_object)
        .is_some_and(|breeds| breeds.contains_key(breed))
}

/// `message` as a list of strings, `None` if it is anything else.
#[must_use]
pub fn string_list(response: &ApiResponse) -> Option<Vec<String>> {
    response
        .field(MESSAGE_KEY)?
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use restcheck_core::{Outcome, Report, ReportMeta, ValidationMode};
    use serde_json::json;

    #[test]
    fn bulldog_present_is_listed() {
        let resp = ApiResponse::json(
            200,
            "OK",
            &json!({"status": "success", "message": {"bulldog": ["boston", "english"], "hound": []}}),
        );
        assert!(breed_listed(&resp, "bulldog"));
        assert!(!breed_listed(&resp, "poodle"));
    }

    #[test]
    fn list_message_is_not_a_breed_mapping() {
        let resp = ApiResponse::json(200, "OK", &json!({"status": "success", "message": ["bulldog"]}));
        assert!(!breed_listed(&resp, "bulldog"));
    }

    #[test]
    fn string_list_rejects_mixed_arrays() {
        let ok = ApiResponse::json(200, "OK", &json!({"message": ["boston", "english"]}));
        assert_eq!(string_list(&ok), Some(vec!["boston".into(), "english".into()]));

        let mixed = ApiResponse::json(200, "OK", &json!({"message": ["boston", 3]}));
        assert_eq!(string_list(&mixed), None);

        let missing = ApiResponse::json(200, "OK", &json!({"status": "success"}));
        assert_eq!(string_list(&missing), None);
    }

    #[test]
    fn absent_breed_fails_citing_the_breed() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = Report::open(ReportMeta::new("linux", "ci", "Dog"), dir.path());
        let resp = ApiResponse::json(200, "OK", &json!({"status": "success", "message": {"hound": []}}));
        {
            let mut runner = CaseRunner::new(&mut report, ValidationMode::Exhaustive);
            runner.case("listed", "", |log| {
                ensure(
                    log,
                    breed_listed(&resp, "bulldog"),
                    "breed list",
                    "bulldog is on the list of breeds".into(),
                    "bulldog is not on the list of breeds".into(),
                )
            });
            let results = runner.finish();
            assert!(!results[0].passed);
            assert!(results[0].message.as_deref().unwrap().contains("bulldog"));
        }
        let line = &report.entries()[0].lines[0];
        assert_eq!(line.outcome, Outcome::Fail);
        assert!(line.message.contains("bulldog"));
        report.close().unwrap();
    }
}
