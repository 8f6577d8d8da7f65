//! The eight-role website crew.

use super::Crew;
use crate::core::Role;
use crate::errors::SitecrewError;
use crate::materialize::RoleSummary;
use crate::model::GenerationParams;
use crate::pipeline::PipelineBuilder;
use crate::stages::Stage;
use std::sync::Arc;

/// Request used when the user gives none.
pub const DEFAULT_WEBSITE_REQUEST: &str =
    "Create a modern business website for a tech startup with services, portfolio, team, and contact sections";

/// Fence labels pulled out of a finished run, in file-writing order.
pub const WEBSITE_ARTIFACT_LABELS: [&str; 3] = ["html", "css", "javascript"];

/// The planning chain, in order. The development stage reads all of it.
const PLANNING_STAGES: [&str; 6] = [
    "planning",
    "business_analysis",
    "design",
    "architecture",
    "content",
    "seo",
];

struct StageDef {
    id: &'static str,
    role: (&'static str, &'static str, &'static str),
    roster: (&'static str, &'static str),
    depends_on: &'static [&'static str],
    template: &'static str,
    expected_output: &'static str,
}

const STAGES: [StageDef; 8] = [
    StageDef {
        id: "planning",
        role: (
            "Senior Project Manager",
            "Analyze requirements, create project specifications, and coordinate the entire development process",
            "You are a senior project manager with 10+ years of experience leading web development projects. \
             You excel at breaking down complex requirements into actionable tasks and ensuring quality deliverables.",
        ),
        roster: ("Project Manager", "Project planning and coordination"),
        depends_on: &[],
        template: "Analyze this website requirement: '{{request}}'

Create a comprehensive project plan including:
1. Project scope and objectives
2. Target audience analysis
3. Technical requirements
4. Feature list and priorities
5. Technology stack recommendations
6. Project timeline and milestones
7. Success metrics and KPIs

Provide a detailed project specification document.",
        expected_output: "Comprehensive project specification with scope, requirements, and technical recommendations",
    },
    StageDef {
        id: "business_analysis",
        role: (
            "Business Analyst",
            "Define user requirements, create user stories, and ensure the website meets business objectives",
            "You are an experienced business analyst who specializes in translating business needs into technical \
             requirements. You understand user experience and business goals.",
        ),
        roster: ("Business Analyst", "Requirements and user stories"),
        depends_on: &["planning"],
        template: "Based on the project requirement: '{{request}}' and the project plan,

Create detailed business analysis including:
1. User personas and journey mapping
2. Functional requirements
3. User stories with acceptance criteria
4. Business logic requirements
5. Integration requirements
6. Performance requirements
7. Security requirements

Focus on understanding the business value and user needs.",
        expected_output: "Detailed user stories, functional requirements, and business logic specifications",
    },
    StageDef {
        id: "design",
        role: (
            "Senior UI/UX Designer",
            "Create modern, user-friendly, and accessible design systems with professional aesthetics",
            "You are a senior UI/UX designer with expertise in modern design trends, accessibility standards, and \
             user psychology. You create award-winning designs that convert visitors into customers.",
        ),
        roster: ("UI/UX Designer", "Design system and user experience"),
        depends_on: &["business_analysis"],
        template: "Create a professional design system for: '{{request}}'
Using the project specifications and business requirements,

Design a comprehensive UI/UX system including:
1. Brand identity and visual hierarchy
2. Color palette with accessibility considerations
3. Typography scale and font choices
4. Component library specifications
5. Layout grids and spacing system
6. Responsive breakpoint strategy
7. Interactive states and animations
8. Accessibility compliance (WCAG 2.1 AA)
9. User flow wireframes
10. Modern design trends implementation

Create detailed design specifications that follow current industry standards.",
        expected_output: "Complete design system with components, layouts, and accessibility guidelines",
    },
    StageDef {
        id: "architecture",
        role: (
            "Frontend Architect",
            "Design scalable frontend architecture using modern best practices and performance optimization",
            "You are a frontend architect with deep knowledge of modern JavaScript, CSS methodologies, performance \
             optimization, and web standards. You ensure code is maintainable and scalable.",
        ),
        roster: ("Frontend Architect", "Technical architecture"),
        depends_on: &["design"],
        template: "Design frontend architecture for: '{{request}}'
Based on the project requirements and design system,

Create technical architecture including:
1. File structure and organization
2. CSS methodology (BEM/SMACSS/CSS Modules)
3. JavaScript architecture patterns
4. Performance optimization strategy
5. Code splitting and lazy loading
6. State management approach
7. Build process and tooling
8. Browser compatibility strategy
9. Progressive Web App features
10. Security best practices

Ensure scalable and maintainable code architecture.",
        expected_output: "Technical architecture plan with file structure, methodologies, and performance strategies",
    },
    StageDef {
        id: "content",
        role: (
            "Content Strategist",
            "Create compelling, SEO-optimized content that engages users and drives conversions",
            "You are a content strategist who understands copywriting, brand voice, and conversion optimization. \
             You create content that tells a story and drives action.",
        ),
        roster: ("Content Strategist", "Content and copywriting"),
        depends_on: &["architecture"],
        template: "Create content strategy for: '{{request}}'
Using the business analysis and design specifications,

Develop comprehensive content including:
1. Brand voice and tone guidelines
2. SEO-optimized headlines and copy
3. Compelling calls-to-action
4. Micro-copy and UX writing
5. Content hierarchy and information architecture
6. Social media integration content
7. Accessibility-friendly alt texts and descriptions
8. Conversion-focused landing page copy
9. Error messages and user feedback text
10. Meta descriptions and SEO content

Ensure all content drives user engagement and conversions.",
        expected_output: "Complete content strategy with copy, CTAs, and SEO-optimized text",
    },
    StageDef {
        id: "seo",
        role: (
            "SEO Specialist",
            "Optimize website structure and content for search engines and performance",
            "You are an SEO expert who understands technical SEO, page speed optimization, and search engine \
             algorithms. You ensure websites rank well and load fast.",
        ),
        roster: ("SEO Specialist", "Search optimization"),
        depends_on: &["content"],
        template: "Create SEO and performance optimization strategy for: '{{request}}'

Develop comprehensive optimization including:
1. Technical SEO implementation
2. Page speed optimization techniques
3. Core Web Vitals optimization
4. Schema markup strategy
5. Meta tags and structured data
6. Image optimization and lazy loading
7. Critical CSS and resource loading
8. Mobile-first optimization
9. Analytics and tracking setup
10. Performance monitoring recommendations

Ensure the website loads fast and ranks well in search engines.",
        expected_output: "SEO strategy with technical optimizations and performance guidelines",
    },
    StageDef {
        id: "development",
        role: (
            "Senior Frontend Developer",
            "Implement pixel-perfect, responsive, and interactive web interfaces using cutting-edge technologies",
            "You are a senior frontend developer with expertise in HTML5, CSS3, JavaScript ES6+, and modern \
             frameworks. You write clean, semantic, and performant code.",
        ),
        roster: ("Frontend Developer", "Code implementation"),
        depends_on: &PLANNING_STAGES,
        template: "Implement the complete website for: '{{request}}'
Using ALL previous specifications: architecture, design, content, and SEO requirements,

Create production-ready code including:
1. Semantic HTML5 with proper structure
2. Modern CSS3 with custom properties and grid/flexbox
3. Vanilla JavaScript with ES6+ features
4. Responsive design with mobile-first approach
5. Accessibility features (ARIA, keyboard navigation)
6. Performance optimizations (lazy loading, minification)
7. SEO-friendly structure with meta tags
8. Progressive enhancement
9. Cross-browser compatibility
10. Clean, documented, and maintainable code
11. Interactive features and animations
12. Form validation and error handling

Generate complete HTML, CSS, and JavaScript files with professional code quality.
Include detailed code comments explaining functionality.
Return each file in its own fenced code block labelled ```html, ```css and ```javascript.",
        expected_output: "Complete, production-ready HTML, CSS, and JavaScript code with professional quality",
    },
    StageDef {
        id: "qa",
        role: (
            "Quality Assurance Engineer",
            "Test website functionality, accessibility, and cross-browser compatibility",
            "You are a QA engineer who ensures websites work flawlessly across all devices and browsers. You test \
             for bugs, accessibility issues, and performance problems.",
        ),
        roster: ("QA Engineer", "Quality assurance and testing"),
        depends_on: &["development"],
        template: "Perform comprehensive quality assurance for the developed website.
Review the implemented code and create testing recommendations.

Provide QA analysis including:
1. Code quality review
2. Accessibility testing checklist
3. Cross-browser compatibility notes
4. Mobile responsiveness verification
5. Performance optimization suggestions
6. SEO implementation review
7. User experience testing scenarios
8. Security best practices check
9. Bug identification and fixes
10. Deployment readiness checklist

Ensure the website meets professional standards.",
        expected_output: "Comprehensive QA report with testing checklist and quality improvements",
    },
];

impl StageDef {
    fn to_stage(&self) -> Stage {
        let (name, objective, persona) = self.role;
        Stage::new(self.id, Arc::new(Role::new(name, objective, persona)), self.template)
            .with_dependencies(self.depends_on.iter().copied())
            .with_expected_output(self.expected_output)
    }
}

/// Builds the website crew.
///
/// The six planning stages form a chain, each reading the one before it.
/// `development` reads all six of them and `qa` reviews `development`.
///
/// # Errors
///
/// Returns an error only if the stage table is inconsistent.
pub fn website() -> Result<Crew, SitecrewError> {
    let pipeline = PipelineBuilder::new("website")
        .with_default_request(DEFAULT_WEBSITE_REQUEST)
        .with_params(GenerationParams::new(0.3, 2048))
        .stages(STAGES.iter().map(StageDef::to_stage))?
        .build()?;

    let roster = STAGES
        .iter()
        .map(|def| RoleSummary::new(def.roster.0, def.roster.1))
        .collect();

    Ok(Crew::new(pipeline)
        .with_artifact_labels(WEBSITE_ARTIFACT_LABELS)
        .with_roster(roster))
}
