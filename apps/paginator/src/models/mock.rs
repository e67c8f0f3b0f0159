//! Deterministic mock resumes in four sizes, used by the preview binary and tests.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::resume::{
    Contact, EducationItem, ExperienceItem, Header, Placed, ProjectItem, ResumeContentModel,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MockDataSize {
    Small,
    Medium,
    Large,
    XLarge,
}

impl FromStr for MockDataSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(MockDataSize::Small),
            "medium" => Ok(MockDataSize::Medium),
            "large" => Ok(MockDataSize::Large),
            "xlarge" => Ok(MockDataSize::XLarge),
            other => Err(format!("unknown mock data size '{other}'")),
        }
    }
}

struct Counts {
    skills: usize,
    per_section: usize,
}

impl MockDataSize {
    fn counts(self) -> Counts {
        match self {
            MockDataSize::Small => Counts { skills: 10, per_section: 1 },
            MockDataSize::Medium => Counts { skills: 20, per_section: 2 },
            MockDataSize::Large => Counts { skills: 30, per_section: 3 },
            MockDataSize::XLarge => Counts { skills: 60, per_section: 6 },
        }
    }
}

const SKILL_POOL: &[&str] = &[
    "JavaScript", "TypeScript", "Python", "Java", "C++", "C#", "Go", "Rust", "Swift", "Kotlin",
    "React", "Vue.js", "Angular", "Next.js", "Node.js", "Express", "Django", "Flask", "Spring",
    "Laravel", "PostgreSQL", "MySQL", "MongoDB", "Redis", "Elasticsearch", "DynamoDB",
    "Cassandra", "Neo4j", "SQLite", "Oracle", "AWS", "Azure", "GCP", "Docker", "Kubernetes",
    "Terraform", "Ansible", "Jenkins", "GitLab CI", "GitHub Actions", "GraphQL", "REST API",
    "gRPC", "WebSocket", "Microservices", "Serverless", "Lambda", "S3", "EC2", "RDS", "HTML5",
    "CSS3", "SASS", "LESS", "Tailwind CSS", "Bootstrap", "Material-UI", "Ant Design", "Webpack",
    "Vite",
];

const PROJECTS: &[(&str, &str)] = &[
    ("E-commerce Platform", "Full-stack e-commerce solution with payment integration, serving 50K+ active users. Implemented real-time inventory management and secure checkout process."),
    ("Cloud Migration Project", "Led migration of legacy systems to AWS, reducing infrastructure costs by 35% and improving system reliability."),
    ("Mobile Banking App", "Developed mobile-first banking application with biometric authentication, handling 100K+ daily transactions securely."),
    ("AI Recommendation System", "Built machine learning recommendation engine that improved user engagement by 45% using collaborative filtering algorithms."),
    ("Real-time Analytics Dashboard", "Created real-time analytics dashboard processing 1M+ events per minute using Apache Kafka and Elasticsearch."),
    ("IoT Device Management", "Designed and implemented IoT platform managing 10K+ connected devices with real-time monitoring and alerting."),
];

const COMPANIES: &[&str] = &[
    "Tech Corp", "Startup Inc", "Global Solutions", "Innovation Labs", "Digital Ventures",
    "Cloud Systems",
];

const POSITIONS: &[&str] = &[
    "Senior Software Engineer", "Software Engineer", "Lead Developer", "Full Stack Developer",
    "Backend Engineer", "Frontend Engineer",
];

const INSTITUTIONS: &[&str] = &[
    "University of Technology", "State University", "Tech Institute", "Engineering College",
    "Computer Science University", "Institute of Technology",
];

const DEGREES: &[&str] = &[
    "Bachelor of Science in Computer Science",
    "Master of Science in Software Engineering",
    "Bachelor of Engineering",
    "Master of Computer Applications",
    "Bachelor of Information Technology",
    "Master of Science in Data Science",
];

const LANGUAGES: &[&str] = &["English", "Spanish", "French", "German", "Mandarin", "Japanese"];

const ACHIEVEMENTS: &[&str] = &[
    "Best Innovation Award - Tech Corp Annual Awards 2022",
    "Published 3 technical articles on cloud architecture",
    "Open source contributor with 500+ GitHub stars",
    "Led team that won Best Product Award at Tech Conference 2023",
    "Speaker at International Developer Conference 2022",
    "Mentored 10+ junior developers, improving team productivity by 25%",
];

const CERTIFICATIONS: &[&str] = &[
    "AWS Certified Solutions Architect - 2021",
    "Kubernetes Certified Administrator - 2020",
    "Google Cloud Professional Cloud Architect - 2019",
    "Microsoft Azure Solutions Architect Expert - 2022",
    "Docker Certified Associate - 2021",
    "Certified Kubernetes Application Developer - 2023",
];

fn entries(pool: &[&str], count: usize) -> Vec<Placed<String>> {
    pool.iter()
        .cycle()
        .take(count)
        .map(|s| Placed::new(s.to_string()))
        .collect()
}

/// Builds an unannotated resume of the requested size.
pub fn generate_mock_data(size: MockDataSize) -> ResumeContentModel {
    let Counts { skills, per_section } = size.counts();

    let experience = (0..per_section)
        .map(|i| {
            let year = 2024 - (i as i32) * 2;
            Placed::new(ExperienceItem {
                position: POSITIONS[i % POSITIONS.len()].to_string(),
                company: COMPANIES[i % COMPANIES.len()].to_string(),
                start_date: year.to_string(),
                end_date: if i == 0 {
                    "Present".to_string()
                } else {
                    (year - 2).to_string()
                },
                description: vec![
                    format!("Improved system performance by {}% through optimization", 40 + i * 5),
                    format!("Led team of {} developers in agile environment", 5 + i),
                    format!("Architected scalable solutions handling {}M+ requests daily", 10 + i * 5),
                ],
            })
        })
        .collect();

    let projects = (0..per_section)
        .map(|i| {
            let (name, description) = PROJECTS[i % PROJECTS.len()];
            Placed::new(ProjectItem {
                name: name.to_string(),
                description: description.to_string(),
            })
        })
        .collect();

    let education = (0..per_section)
        .map(|i| {
            let start = 2018 - (i as i32) * 2;
            Placed::new(EducationItem {
                institution: INSTITUTIONS[i % INSTITUTIONS.len()].to_string(),
                degree: DEGREES[i % DEGREES.len()].to_string(),
                start_date: start.to_string(),
                end_date: (start + 4).to_string(),
            })
        })
        .collect();

    ResumeContentModel {
        header: Placed::new(Header {
            name: "John Doe".to_string(),
            title: "Senior Software Engineer".to_string(),
            contact: Contact {
                phone: "+1 (555) 123-4567".to_string(),
                email: "john.doe@example.com".to_string(),
                website: "johndoe.dev".to_string(),
                location: "San Francisco, CA".to_string(),
            },
        }),
        profile: Placed::new(
            "Experienced software engineer with 8+ years of expertise in full-stack development, \
             cloud architecture, and team leadership. Proven track record of delivering scalable \
             solutions and leading cross-functional teams."
                .to_string(),
        ),
        skills: entries(SKILL_POOL, skills),
        experience,
        projects,
        education,
        languages: entries(LANGUAGES, per_section),
        achievements: entries(ACHIEVEMENTS, per_section),
        certifications: entries(CERTIFICATIONS, per_section),
    }
}
