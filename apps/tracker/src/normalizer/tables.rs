//! Built-in section tables.
//!
//! Candidate lists cover every result shape the extraction backend has emitted:
//! nested `personal_info.contact.*` and flat top-level contact fields,
//! `employment_history` / `experience` / `work_experience`, and the award,
//! certification and language object variants.

use crate::normalizer::classify::CategoryFamily;
use crate::normalizer::fields::FieldSpec;
use crate::normalizer::sections::SectionSpec;

const CONTACT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", &["name", "full_name", "contact.name", "candidate_name"]),
    FieldSpec::new(
        "email",
        &["contact.email", "email", "email_address", "contact_info.email"],
    ),
    FieldSpec::new(
        "phone",
        &["contact.phone", "phone", "phone_number", "mobile", "contact_info.phone"],
    ),
    FieldSpec::new(
        "location",
        &["contact.location", "location", "address", "contact_info.location"],
    ),
    FieldSpec::new(
        "linkedin",
        &["contact.linkedin", "linkedin", "links.linkedin", "social.linkedin"],
    ),
    FieldSpec::new(
        "website",
        &["contact.website", "website", "portfolio", "links.website"],
    ),
];

const SUMMARY_FIELDS: &[FieldSpec] = &[FieldSpec::new("text", &["text", "summary", "content"])];

const EXPERIENCE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", &["title", "position", "job_title", "role"]),
    FieldSpec::new(
        "company",
        &["company", "employer", "organization", "company_name"],
    ),
    FieldSpec::new("location", &["location", "city"]),
    FieldSpec::new("start_date", &["start_date", "from", "start", "period.start"]),
    FieldSpec::new("end_date", &["end_date", "to", "end", "period.end"]),
    FieldSpec::new("employment_type", &["employment_type", "type", "job_type"])
        .classified(CategoryFamily::EmploymentType),
    FieldSpec::new(
        "work_mode",
        &["work_mode", "work_arrangement", "location_type", "workplace_type"],
    )
    .classified(CategoryFamily::WorkMode),
    FieldSpec::new(
        "description",
        &["description", "summary", "responsibilities", "achievements", "highlights"],
    ),
];

const EDUCATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "institution",
        &["institution", "school", "university", "college"],
    ),
    FieldSpec::new("degree", &["degree", "qualification", "study_type"]),
    FieldSpec::new("field", &["field_of_study", "field", "major", "area"]),
    FieldSpec::new("start_date", &["start_date", "from", "start"]),
    FieldSpec::new(
        "end_date",
        &["end_date", "graduation_date", "to", "end", "graduation_year", "year"],
    ),
    FieldSpec::new("grade", &["gpa", "grade", "score"]),
];

const SKILL_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", &["name", "skill", "title"]),
    FieldSpec::new("category", &["category", "group"]),
    FieldSpec::new("level", &["level", "proficiency"]),
    FieldSpec::new("keywords", &["keywords", "items", "skills"]),
];

const PROJECT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", &["name", "title", "project_name"]),
    FieldSpec::new("role", &["role", "position"]),
    FieldSpec::new("description", &["description", "summary", "highlights"]),
    FieldSpec::new(
        "technologies",
        &["technologies", "tech_stack", "tools", "skills"],
    ),
    FieldSpec::new("url", &["url", "link", "github", "repository"]),
];

const CERTIFICATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", &["name", "title", "certification"]),
    FieldSpec::new(
        "issuer",
        &["issuer", "organization", "issuing_organization", "authority"],
    ),
    FieldSpec::new("date", &["date", "year", "issue_date", "date_obtained"]),
    FieldSpec::new("credential_id", &["credential_id", "license_number"]),
];

const AWARD_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("display_name", &["name", "title"]),
    FieldSpec::new("org", &["issuer", "organization", "awarder"]),
    FieldSpec::new("date", &["year", "date"]),
    FieldSpec::new("description", &["description", "summary"]),
];

// Level precedence: self-assessment, then CEFR grade, then the generic level field.
const LANGUAGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("language", &["language", "name"]),
    FieldSpec::new(
        "level",
        &[
            "proficiency.self_assessed",
            "self_assessed",
            "proficiency.cefr",
            "cefr",
            "cefr_level",
            "proficiency.level",
            "level",
            "proficiency",
            "fluency",
        ],
    )
    .classified(CategoryFamily::LanguageProficiency),
];

const PUBLICATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", &["title", "name"]),
    FieldSpec::new(
        "venue",
        &["venue", "publisher", "journal", "conference"],
    ),
    FieldSpec::new("date", &["date", "year", "published"]),
    FieldSpec::new("url", &["url", "doi", "link"]),
];

const VOLUNTEER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("role", &["role", "position", "title"]),
    FieldSpec::new(
        "organization",
        &["organization", "company", "org"],
    ),
    FieldSpec::new("start_date", &["start_date", "from", "start"]),
    FieldSpec::new("end_date", &["end_date", "to", "end"]),
    FieldSpec::new("description", &["description", "summary"]),
];

const INTEREST_FIELDS: &[FieldSpec] = &[FieldSpec::new("name", &["name", "title", "interest"])];

/// Resume sections in display order, resolved against the resume root.
pub const RESUME_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        key: "personal_info",
        title: "Personal Information",
        candidate_paths: &["personal_info", "contact_info", "basics"],
        always_show: true,
        root_fields: true,
        fields: CONTACT_FIELDS,
    },
    SectionSpec {
        key: "summary",
        title: "Professional Summary",
        candidate_paths: &[
            "summary",
            "professional_summary",
            "personal_info.summary",
            "profile",
            "objective",
        ],
        always_show: false,
        root_fields: false,
        fields: SUMMARY_FIELDS,
    },
    SectionSpec {
        key: "experience",
        title: "Work Experience",
        candidate_paths: &[
            "employment_history",
            "experience",
            "work_experience",
            "work_history",
        ],
        always_show: true,
        root_fields: false,
        fields: EXPERIENCE_FIELDS,
    },
    SectionSpec {
        key: "education",
        title: "Education",
        candidate_paths: &["education", "education_history", "academic_background"],
        always_show: true,
        root_fields: false,
        fields: EDUCATION_FIELDS,
    },
    SectionSpec {
        key: "skills",
        title: "Skills",
        candidate_paths: &["skills", "technical_skills", "skill_set", "competencies"],
        always_show: true,
        root_fields: false,
        fields: SKILL_FIELDS,
    },
    SectionSpec {
        key: "projects",
        title: "Projects",
        candidate_paths: &["projects", "personal_projects", "key_projects"],
        always_show: false,
        root_fields: false,
        fields: PROJECT_FIELDS,
    },
    SectionSpec {
        key: "certifications",
        title: "Certifications",
        candidate_paths: &[
            "certifications",
            "certificates",
            "licenses_and_certifications",
            "licenses",
        ],
        always_show: false,
        root_fields: false,
        fields: CERTIFICATION_FIELDS,
    },
    SectionSpec {
        key: "awards",
        title: "Awards & Honors",
        candidate_paths: &["awards", "honors", "awards_and_honors", "achievements"],
        always_show: false,
        root_fields: false,
        fields: AWARD_FIELDS,
    },
    SectionSpec {
        key: "languages",
        title: "Languages",
        candidate_paths: &[
            "languages",
            "language_proficiency",
            "language_skills",
            "personal_info.languages",
        ],
        always_show: false,
        root_fields: false,
        fields: LANGUAGE_FIELDS,
    },
    SectionSpec {
        key: "publications",
        title: "Publications",
        candidate_paths: &["publications", "research", "papers"],
        always_show: false,
        root_fields: false,
        fields: PUBLICATION_FIELDS,
    },
    SectionSpec {
        key: "volunteer",
        title: "Volunteer Experience",
        candidate_paths: &[
            "volunteer_experience",
            "volunteering",
            "volunteer_work",
            "volunteer",
        ],
        always_show: false,
        root_fields: false,
        fields: VOLUNTEER_FIELDS,
    },
    SectionSpec {
        key: "interests",
        title: "Interests",
        candidate_paths: &["interests", "hobbies"],
        always_show: false,
        root_fields: false,
        fields: INTEREST_FIELDS,
    },
];

const POINT_FIELDS: &[FieldSpec] = &[FieldSpec::new(
    "text",
    &["text", "point", "description", "title"],
)];

/// Review sections, resolved against the result's `review` object.
pub const REVIEW_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        key: "score",
        title: "Overall Score",
        candidate_paths: &["overall_score", "score", "rating", "scores.overall"],
        always_show: false,
        root_fields: false,
        fields: &[],
    },
    SectionSpec {
        key: "strengths",
        title: "Strengths",
        candidate_paths: &["strengths", "pros"],
        always_show: false,
        root_fields: false,
        fields: POINT_FIELDS,
    },
    SectionSpec {
        key: "improvements",
        title: "Areas for Improvement",
        candidate_paths: &[
            "improvements",
            "areas_for_improvement",
            "weaknesses",
            "suggestions",
        ],
        always_show: false,
        root_fields: false,
        fields: POINT_FIELDS,
    },
    SectionSpec {
        key: "feedback",
        title: "Feedback",
        candidate_paths: &["feedback", "overall_feedback", "summary", "comments"],
        always_show: false,
        root_fields: false,
        fields: POINT_FIELDS,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_section_keys_are_unique() {
        for table in [RESUME_SECTIONS, REVIEW_SECTIONS] {
            let keys: HashSet<_> = table.iter().map(|s| s.key).collect();
            assert_eq!(keys.len(), table.len());
        }
    }

    #[test]
    fn test_every_section_has_candidates() {
        for spec in RESUME_SECTIONS.iter().chain(REVIEW_SECTIONS) {
            assert!(!spec.candidate_paths.is_empty(), "{} has no candidates", spec.key);
        }
    }

    #[test]
    fn test_root_fields_only_for_personal_info() {
        for spec in RESUME_SECTIONS.iter().chain(REVIEW_SECTIONS) {
            assert_eq!(spec.root_fields, spec.key == "personal_info", "{}", spec.key);
            assert!(!spec.candidate_paths.contains(&"$"), "{}", spec.key);
        }
    }

    #[test]
    fn test_experience_schema_precedence() {
        let experience = RESUME_SECTIONS.iter().find(|s| s.key == "experience").unwrap();
        assert_eq!(
            &experience.candidate_paths[..3],
            &["employment_history", "experience", "work_experience"]
        );
    }
}
