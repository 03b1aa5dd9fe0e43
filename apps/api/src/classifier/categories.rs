/// A job category and the lowercase keywords that signal it.
pub type JobCategory = (&'static str, &'static [&'static str]);

/// Category returned when no keyword matches.
pub const FALLBACK_CATEGORY: &str = "General";

/// Ordered category table. Order is significant: earlier entries win ties in
/// keyword scoring and set the order of extracted skills.
pub static CATEGORIES: &[JobCategory] = &[
    (
        "Data Science",
        &[
            "python",
            "pandas",
            "numpy",
            "machine learning",
            "statistics",
            "sql",
            "scikit",
            "tensorflow",
            "pytorch",
            "data analysis",
        ],
    ),
    (
        "Software Engineering",
        &[
            "javascript",
            "typescript",
            "react",
            "node",
            "java",
            "c++",
            "c#",
            "go",
            "docker",
            "kubernetes",
            "git",
            "api",
            "microservices",
        ],
    ),
    (
        "DevOps / Cloud",
        &[
            "aws",
            "azure",
            "gcp",
            "terraform",
            "ansible",
            "ci/cd",
            "jenkins",
            "kubernetes",
            "docker",
            "linux",
            "sre",
        ],
    ),
    (
        "Product Management",
        &[
            "product",
            "roadmap",
            "stakeholder",
            "metrics",
            "kpi",
            "user research",
            "backlog",
            "agile",
            "scrum",
        ],
    ),
    (
        "UI/UX Design",
        &[
            "figma",
            "sketch",
            "wireframe",
            "prototype",
            "ux",
            "ui",
            "usability",
            "design system",
            "adobe",
        ],
    ),
    (
        "Data Engineering",
        &[
            "spark",
            "airflow",
            "kafka",
            "hadoop",
            "etl",
            "data pipeline",
            "snowflake",
            "redshift",
            "databricks",
        ],
    ),
    (
        "Cybersecurity",
        &[
            "security",
            "siem",
            "soc",
            "incident response",
            "vulnerability",
            "nist",
            "owasp",
            "splunk",
            "iso 27001",
        ],
    ),
];
