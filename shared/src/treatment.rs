use serde::Serialize;

use crate::labels::TumorClass;

#[derive(Debug, Serialize, PartialEq)]
pub struct TreatmentStep {
    pub heading: &'static str,
    pub actions: &'static [&'static str],
}

/// Static care plan shown next to a prediction.
#[derive(Debug, Serialize, PartialEq)]
pub struct TreatmentPlan {
    pub title: &'static str,
    pub overview: &'static str,
    pub steps: &'static [TreatmentStep],
    pub duration: &'static str,
    pub success_rate: &'static str,
}

impl TreatmentPlan {
    /// Steps flattened into display order: each heading followed by its actions.
    pub fn step_lines(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps
            .iter()
            .flat_map(|step| std::iter::once(step.heading).chain(step.actions.iter().copied()))
    }
}

pub fn treatment_plan(class: TumorClass) -> &'static TreatmentPlan {
    match class {
        TumorClass::Glioma => &GLIOMA,
        TumorClass::Meningioma => &MENINGIOMA,
        TumorClass::NoTumor => &NO_TUMOR,
        TumorClass::Pituitary => &PITUITARY,
    }
}

static GLIOMA: TreatmentPlan = TreatmentPlan {
    title: "Glioma Treatment Plan",
    overview: "Gliomas are tumors that arise from glial cells in the brain. Treatment depends on the grade, location, and type of glioma.",
    steps: &[
        TreatmentStep {
            heading: "1. Initial Assessment and Diagnosis",
            actions: &[
                "Comprehensive neurological examination",
                "Advanced imaging (MRI, CT scans) for tumor characterization",
                "Biopsy to determine tumor grade and molecular markers",
                "Consultation with multidisciplinary team (neurosurgeon, oncologist, neurologist)",
            ],
        },
        TreatmentStep {
            heading: "2. Surgical Intervention",
            actions: &[
                "Maximal safe resection to remove as much tumor as possible",
                "Awake craniotomy for tumors near eloquent brain areas",
                "Intraoperative MRI guidance for precise tumor removal",
                "Postoperative monitoring in ICU",
            ],
        },
        TreatmentStep {
            heading: "3. Radiation Therapy",
            actions: &[
                "External beam radiation therapy (typically 6 weeks)",
                "Stereotactic radiosurgery for small residual tumors",
                "Proton therapy for tumors near critical structures",
                "Fractionated stereotactic radiotherapy",
            ],
        },
        TreatmentStep {
            heading: "4. Chemotherapy",
            actions: &[
                "Temozolomide (TMZ) regimen during and after radiation",
                "PCV chemotherapy (procarbazine, lomustine, vincristine) for anaplastic gliomas",
                "Targeted therapies based on molecular profiling (IDH inhibitors, etc.)",
            ],
        },
        TreatmentStep {
            heading: "5. Follow-up and Monitoring",
            actions: &[
                "Regular MRI scans every 3-6 months",
                "Neurological assessments and quality of life evaluations",
                "Rehabilitation therapy (physical, occupational, speech)",
                "Supportive care for side effects and symptoms",
            ],
        },
    ],
    duration: "Treatment typically spans 6-12 months initially, with lifelong monitoring",
    success_rate: "5-year survival rates vary by grade: 90%+ for low-grade, 10-30% for high-grade",
};

static MENINGIOMA: TreatmentPlan = TreatmentPlan {
    title: "Meningioma Treatment Plan",
    overview: "Meningiomas are typically benign tumors arising from the meninges. Treatment focuses on complete removal when possible.",
    steps: &[
        TreatmentStep {
            heading: "1. Initial Evaluation",
            actions: &[
                "Detailed neurological examination",
                "High-resolution MRI with contrast for tumor characterization",
                "CT scans to assess bone involvement",
                "Angiography to evaluate blood supply to the tumor",
            ],
        },
        TreatmentStep {
            heading: "2. Surgical Treatment",
            actions: &[
                "Complete surgical resection (Simpson Grade I-II)",
                "Craniotomy approach based on tumor location",
                "Microsurgical techniques for tumor dissection",
                "Intraoperative neurophysiological monitoring",
            ],
        },
        TreatmentStep {
            heading: "3. Radiation Therapy Options",
            actions: &[
                "Stereotactic radiosurgery (Gamma Knife, CyberKnife) for residual tumors",
                "Fractionated stereotactic radiotherapy",
                "Conventional external beam radiation for atypical/malignant meningiomas",
                "Proton beam therapy for skull base tumors",
            ],
        },
        TreatmentStep {
            heading: "4. Medical Management",
            actions: &[
                "Hormone therapy for hormone-sensitive tumors",
                "Anti-seizure medications if seizures are present",
                "Pain management and symptom control",
                "Management of peritumoral edema",
            ],
        },
        TreatmentStep {
            heading: "5. Long-term Follow-up",
            actions: &[
                "Annual MRI surveillance for 5 years, then every 2-3 years",
                "Monitoring for tumor recurrence or progression",
                "Rehabilitation services as needed",
                "Regular endocrinological evaluation if pituitary function affected",
            ],
        },
    ],
    duration: "Recovery from surgery: 4-8 weeks, with long-term monitoring",
    success_rate: "95%+ for benign meningiomas with complete resection",
};

static PITUITARY: TreatmentPlan = TreatmentPlan {
    title: "Pituitary Tumor Treatment Plan",
    overview: "Pituitary tumors can affect hormone production and cause various endocrine symptoms. Treatment aims to restore normal pituitary function.",
    steps: &[
        TreatmentStep {
            heading: "1. Comprehensive Evaluation",
            actions: &[
                "Detailed hormonal assessment (pituitary function tests)",
                "Visual field testing for tumors affecting optic nerves",
                "High-resolution MRI with dedicated pituitary protocol",
                "Consultation with endocrinologist and neurosurgeon",
            ],
        },
        TreatmentStep {
            heading: "2. Surgical Treatment",
            actions: &[
                "Transsphenoidal surgery (preferred approach)",
                "Endoscopic endonasal approach for tumor removal",
                "Microscopic or endoscopic techniques",
                "Preservation of normal pituitary tissue when possible",
            ],
        },
        TreatmentStep {
            heading: "3. Medical Therapy",
            actions: &[
                "Dopamine agonists (cabergoline, bromocriptine) for prolactinomas",
                "Somatostatin analogs for growth hormone-secreting tumors",
                "Hormone replacement therapy for deficiencies",
                "Medical management of hormone excess states",
            ],
        },
        TreatmentStep {
            heading: "4. Radiation Therapy",
            actions: &[
                "Stereotactic radiosurgery for residual or recurrent tumors",
                "Conventional radiation for aggressive tumors",
                "Proton therapy for tumors near critical structures",
            ],
        },
        TreatmentStep {
            heading: "5. Long-term Management",
            actions: &[
                "Regular hormonal monitoring and replacement",
                "Annual MRI surveillance",
                "Visual field monitoring",
                "Management of pituitary deficiencies",
                "Fertility counseling if applicable",
            ],
        },
    ],
    duration: "Recovery: 1-3 months, lifelong hormone management may be needed",
    success_rate: "80-90% cure rate for most pituitary tumors",
};

static NO_TUMOR: TreatmentPlan = TreatmentPlan {
    title: "No Tumor Detected - Preventive Care Plan",
    overview: "No abnormalities detected in the MRI scan. Focus on preventive measures and general brain health.",
    steps: &[
        TreatmentStep {
            heading: "1. Confirmation and Documentation",
            actions: &[
                "Review of imaging results by radiologist",
                "Documentation of findings in medical records",
                "Discussion of incidental findings if any",
            ],
        },
        TreatmentStep {
            heading: "2. Preventive Measures",
            actions: &[
                "Maintain healthy lifestyle (balanced diet, regular exercise)",
                "Avoid smoking and excessive alcohol consumption",
                "Regular cardiovascular health monitoring",
                "Adequate sleep and stress management",
            ],
        },
        TreatmentStep {
            heading: "3. Recommended Screenings",
            actions: &[
                "Annual physical examination",
                "Age-appropriate cancer screenings",
                "Regular blood pressure and cholesterol monitoring",
                "Vision and hearing assessments",
            ],
        },
        TreatmentStep {
            heading: "4. Brain Health Maintenance",
            actions: &[
                "Cognitive exercises and mental stimulation",
                "Social engagement and community involvement",
                "Mediterranean-style diet rich in antioxidants",
                "Regular cardiovascular exercise",
            ],
        },
        TreatmentStep {
            heading: "5. Follow-up Schedule",
            actions: &[
                "Routine check-ups as recommended by primary care physician",
                "Repeat MRI only if new symptoms develop",
                "Monitoring of any pre-existing conditions",
                "Health maintenance counseling",
            ],
        },
    ],
    duration: "Ongoing preventive care with regular medical check-ups",
    success_rate: "Excellent prognosis with healthy lifestyle maintenance",
};
