//! Schemas of the two stored resources.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::json;

use super::types::{FieldDef, Schema};

/// Allowed bootcamp career tracks
pub const CAREERS: &[&str] = &[
    "Web Development",
    "Mobile Development",
    "UI/UX",
    "Data Science",
    "Business",
    "Other",
];

/// Allowed course skill levels
pub const SKILL_LEVELS: &[&str] = &["beginner", "intermediate", "advanced"];

const URL_PATTERN: &str =
    r"^https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)$";

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$";

fn compile(pattern: &str) -> Regex {
    // Both patterns are literals covered by the tests below
    Regex::new(pattern).expect("static pattern compiles")
}

pub fn bootcamp_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new("Bootcamp")
            .field("_id", FieldDef::reference().unique())
            .field(
                "name",
                FieldDef::string()
                    .required("Please add a name")
                    .unique()
                    .trim()
                    .max_length(50, "Name can not be more than 50 characters"),
            )
            .field("slug", FieldDef::string())
            .field(
                "description",
                FieldDef::string()
                    .required("Please add a description")
                    .max_length(500, "Description can not be more than 500 characters"),
            )
            .field(
                "website",
                FieldDef::string().pattern(compile(URL_PATTERN), "Please use a valid URL with HTTP or HTTPS"),
            )
            .field(
                "phone",
                FieldDef::string().max_length(20, "Phone number can not be longer than 20 characters"),
            )
            .field(
                "email",
                FieldDef::string().pattern(compile(EMAIL_PATTERN), "Please add a valid email"),
            )
            .field("address", FieldDef::string().required("Please add an address"))
            .field("location", FieldDef::object())
            .field(
                "careers",
                FieldDef::string_array()
                    .required("Please add at least one career")
                    .one_of(CAREERS),
            )
            .field(
                "averageRating",
                FieldDef::number()
                    .min(1.0, "Rating must be at least 1")
                    .max(10.0, "Rating can not be more than 10"),
            )
            .field("averageCost", FieldDef::number())
            .field("photo", FieldDef::string().default_value(json!("no-photo.jpg")))
            .field("housing", FieldDef::boolean().default_value(json!(false)))
            .field("jobAssistance", FieldDef::boolean().default_value(json!(false)))
            .field("jobGuarantee", FieldDef::boolean().default_value(json!(false)))
            .field("acceptGi", FieldDef::boolean().default_value(json!(false)))
            .field("createdAt", FieldDef::string())
    })
}

pub fn course_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new("Course")
            .field("_id", FieldDef::reference().unique())
            .field(
                "title",
                FieldDef::string().trim().required("Please add a course title"),
            )
            .field("description", FieldDef::string().required("Please add a description"))
            .field("weeks", FieldDef::string().required("Please add number of weeks"))
            .field("tuition", FieldDef::number().required("Please add a tuition cost"))
            .field(
                "minimumSkill",
                FieldDef::string()
                    .required("Please add a minimum skill")
                    .one_of(SKILL_LEVELS),
            )
            .field("scholarshipAvailable", FieldDef::boolean().default_value(json!(false)))
            .field("createdAt", FieldDef::string())
            .field("bootcamp", FieldDef::reference().required("Please add a bootcamp"))
    })
}
