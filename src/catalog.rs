// --- Static Definitions ---

#[derive(Debug, PartialEq, Eq)]
pub struct Lesson {
    pub id: &'static str,
    pub title: &'static str,
    /// Seed for the lesson generation prompt.
    pub topic: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Quiz {
    pub id: &'static str,
    pub topic: &'static str,
    pub question_count: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Level {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub lessons: &'static [Lesson],
    pub quiz: Quiz,
}

impl Level {
    pub fn contains_lesson(&self, lesson_id: &str) -> bool {
        self.lessons.iter().any(|l| l.id == lesson_id)
    }
}

const QUESTIONS_PER_QUIZ: usize = 5;

pub const COURSE: &[Level] = &[
    Level {
        id: "level-1",
        title: "Level 1: Power BI Fundamentals",
        description: "Start the journey. Learn the interface, import data and build your first visuals.",
        lessons: &[
            Lesson {
                id: "l1-1",
                title: "Introduction to Power BI Desktop",
                topic: "Introduction to the Power BI Desktop interface for beginners",
            },
            Lesson {
                id: "l1-2",
                title: "Connecting to Data Sources",
                topic: "Connecting to data sources in Power BI, focusing on Excel and CSV files",
            },
            Lesson {
                id: "l1-3",
                title: "Building Basic Visuals",
                topic: "Creating basic visualizations like bar charts and pie charts in Power BI",
            },
        ],
        quiz: Quiz {
            id: "q1",
            topic: "Power BI Fundamentals",
            question_count: QUESTIONS_PER_QUIZ,
        },
    },
    Level {
        id: "level-2",
        title: "Level 2: Modeling and DAX",
        description: "Get to the heart of Power BI. Model your data and write DAX for powerful calculations.",
        lessons: &[
            Lesson {
                id: "l2-1",
                title: "Introduction to Data Modeling",
                topic: "Introduction to data modeling in Power BI, including relationships and cardinality",
            },
            Lesson {
                id: "l2-2",
                title: "Calculated Columns vs. Measures",
                topic: "Calculated Columns vs. Measures in Power BI DAX",
            },
            Lesson {
                id: "l2-3",
                title: "Essential DAX Functions",
                topic: "Essential DAX functions like SUM, AVERAGE, COUNT, and CALCULATE",
            },
        ],
        quiz: Quiz {
            id: "q2",
            topic: "Power BI Data Modeling and DAX",
            question_count: QUESTIONS_PER_QUIZ,
        },
    },
    Level {
        id: "level-3",
        title: "Level 3: Advanced Report Design",
        description: "Take reports further with themes, bookmarks and professional layout techniques.",
        lessons: &[
            Lesson {
                id: "l3-1",
                title: "Themes and Templates",
                topic: "Using themes and templates to standardize Power BI report design",
            },
            Lesson {
                id: "l3-2",
                title: "Interactivity with Bookmarks and Buttons",
                topic: "Creating interactive reports using bookmarks and buttons in Power BI",
            },
            Lesson {
                id: "l3-3",
                title: "Dashboard Design Principles",
                topic: "Key principles of effective dashboard design and data storytelling",
            },
        ],
        quiz: Quiz {
            id: "q3",
            topic: "Advanced Power BI Report Design",
            question_count: QUESTIONS_PER_QUIZ,
        },
    },
    Level {
        id: "level-4",
        title: "Level 4: Power Query and ETL",
        description: "Master data preparation. Clean, shape and combine data in the Power Query Editor.",
        lessons: &[
            Lesson {
                id: "l4-1",
                title: "The Power Query Editor",
                topic: "Comprehensive overview of the Power Query Editor interface in Power BI",
            },
            Lesson {
                id: "l4-2",
                title: "Common Data Transformations",
                topic: "Common data transformations in Power Query, such as splitting columns, changing data types, and filtering rows",
            },
            Lesson {
                id: "l4-3",
                title: "Merging and Appending Queries",
                topic: "Merging and Appending queries in Power Query to combine data from multiple sources",
            },
        ],
        quiz: Quiz {
            id: "q4",
            topic: "Power Query and Data Transformation",
            question_count: QUESTIONS_PER_QUIZ,
        },
    },
    Level {
        id: "level-5",
        title: "Level 5: Power BI Service and Collaboration",
        description: "Publish reports, build dashboards and collaborate securely in the Power BI cloud service.",
        lessons: &[
            Lesson {
                id: "l5-1",
                title: "Publishing to the Power BI Service",
                topic: "Publishing Power BI reports from Desktop to the Power BI Service",
            },
            Lesson {
                id: "l5-2",
                title: "Interactive Dashboards",
                topic: "Creating and configuring interactive dashboards in the Power BI Service",
            },
            Lesson {
                id: "l5-3",
                title: "Row-Level Security (RLS)",
                topic: "Implementing Row-Level Security (RLS) in Power BI to restrict data access",
            },
        ],
        quiz: Quiz {
            id: "q5",
            topic: "Power BI Service and Collaboration",
            question_count: QUESTIONS_PER_QUIZ,
        },
    },
    Level {
        id: "level-6",
        title: "Level 6: Pro Techniques and Optimization",
        description: "Tune model performance and extend Power BI beyond the built-in features.",
        lessons: &[
            Lesson {
                id: "l6-1",
                title: "Optimizing Models with DAX Studio",
                topic: "Using DAX Studio to analyze and optimize Power BI data models for performance",
            },
            Lesson {
                id: "l6-2",
                title: "Custom Visuals",
                topic: "Importing and using custom visuals from the AppSource marketplace in Power BI",
            },
            Lesson {
                id: "l6-3",
                title: "Python and R Integration",
                topic: "Introduction to integrating Python and R scripts in Power BI for advanced analytics",
            },
        ],
        quiz: Quiz {
            id: "q6",
            topic: "Power BI Pro Techniques and Optimization",
            question_count: QUESTIONS_PER_QUIZ,
        },
    },
];

// --- Lookups ---

/// The level every new learner starts with. Catalogs are never empty.
pub fn first_level(catalog: &[Level]) -> &Level {
    &catalog[0]
}

pub fn level_index(catalog: &[Level], level_id: &str) -> Option<usize> {
    catalog.iter().position(|l| l.id == level_id)
}

/// The level that passing `level_id`'s quiz unlocks, if any.
pub fn next_level<'a>(catalog: &'a [Level], level_id: &str) -> Option<&'a Level> {
    level_index(catalog, level_id).and_then(|i| catalog.get(i + 1))
}

pub fn total_lessons(catalog: &[Level]) -> usize {
    catalog.iter().map(|l| l.lessons.len()).sum()
}
