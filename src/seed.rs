//! Sample data
//!
//! Inserts a fixed set of students, skipping codes that already exist.

use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, QueryFilter, Set};
use tracing::{info, warn};

use crate::entity::student::{self, StudentStatus};
use crate::repo::SoftDelete;

struct SampleStudent {
    code: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    phone: &'static str,
    born: (i32, u32, u32),
    address: &'static str,
    major: &'static str,
    year: i32,
    gpa: f64,
    status: StudentStatus,
}

const SAMPLE_STUDENTS: &[SampleStudent] = &[
    SampleStudent {
        code: "SV001",
        first_name: "Nguyễn",
        last_name: "Văn An",
        email: "nguyen.van.an@student.edu.vn",
        phone: "0901234567",
        born: (2002, 5, 15),
        address: "123 Đường ABC, Quận 1, TP.HCM",
        major: "Computer Science",
        year: 3,
        gpa: 3.75,
        status: StudentStatus::Active,
    },
    SampleStudent {
        code: "SV002",
        first_name: "Trần",
        last_name: "Thị Bình",
        email: "tran.thi.binh@student.edu.vn",
        phone: "0902345678",
        born: (2003, 8, 22),
        address: "456 Đường XYZ, Quận 2, TP.HCM",
        major: "Information Technology",
        year: 2,
        gpa: 3.85,
        status: StudentStatus::Active,
    },
    SampleStudent {
        code: "SV003",
        first_name: "Lê",
        last_name: "Minh Cường",
        email: "le.minh.cuong@student.edu.vn",
        phone: "0903456789",
        born: (2001, 12, 10),
        address: "789 Đường DEF, Quận 3, TP.HCM",
        major: "Software Engineering",
        year: 4,
        gpa: 3.92,
        status: StudentStatus::Active,
    },
    SampleStudent {
        code: "SV004",
        first_name: "Phạm",
        last_name: "Thu Dung",
        email: "pham.thu.dung@student.edu.vn",
        phone: "0904567890",
        born: (2002, 3, 8),
        address: "321 Đường GHI, Quận 4, TP.HCM",
        major: "Data Science",
        year: 3,
        gpa: 3.68,
        status: StudentStatus::Active,
    },
    SampleStudent {
        code: "SV005",
        first_name: "Hoàng",
        last_name: "Văn Em",
        email: "hoang.van.em@student.edu.vn",
        phone: "0905678901",
        born: (2003, 11, 25),
        address: "654 Đường JKL, Quận 5, TP.HCM",
        major: "Computer Science",
        year: 2,
        gpa: 3.45,
        status: StudentStatus::Active,
    },
    SampleStudent {
        code: "SV006",
        first_name: "Vũ",
        last_name: "Thị Phương",
        email: "vu.thi.phuong@student.edu.vn",
        phone: "0906789012",
        born: (2000, 7, 18),
        address: "987 Đường MNO, Quận 6, TP.HCM",
        major: "Information Technology",
        year: 4,
        gpa: 3.88,
        status: StudentStatus::Graduated,
    },
    SampleStudent {
        code: "SV007",
        first_name: "Đặng",
        last_name: "Minh Quang",
        email: "dang.minh.quang@student.edu.vn",
        phone: "0907890123",
        born: (2002, 9, 5),
        address: "147 Đường PQR, Quận 7, TP.HCM",
        major: "Artificial Intelligence",
        year: 3,
        gpa: 3.95,
        status: StudentStatus::Active,
    },
    SampleStudent {
        code: "SV008",
        first_name: "Bùi",
        last_name: "Thị Hương",
        email: "bui.thi.huong@student.edu.vn",
        phone: "0908901234",
        born: (2003, 4, 12),
        address: "258 Đường STU, Quận 8, TP.HCM",
        major: "Cybersecurity",
        year: 2,
        gpa: 3.72,
        status: StudentStatus::Active,
    },
];

/// Insert the sample students. Returns how many rows were created.
pub async fn seed_students(db: &DatabaseConnection) -> anyhow::Result<usize> {
    let mut created = 0;

    for sample in SAMPLE_STUDENTS {
        let existing = student::Entity::live()
            .filter(student::Column::StudentCode.eq(sample.code))
            .one(db)
            .await?;
        if existing.is_some() {
            info!("Student {} already exists", sample.code);
            continue;
        }

        let (y, m, d) = sample.born;
        let am = student::ActiveModel {
            student_code: Set(sample.code.to_string()),
            first_name: Set(sample.first_name.to_string()),
            last_name: Set(sample.last_name.to_string()),
            email: Set(sample.email.to_string()),
            phone: Set(Some(sample.phone.to_string())),
            date_of_birth: Set(NaiveDate::from_ymd_opt(y, m, d)),
            address: Set(Some(sample.address.to_string())),
            major: Set(Some(sample.major.to_string())),
            year: Set(Some(sample.year)),
            gpa: Set(Some(sample.gpa)),
            status: Set(sample.status),
            ..Default::default()
        };

        match am.insert(db).await {
            Ok(s) => {
                info!("Created student: {} {} ({})", s.first_name, s.last_name, s.student_code);
                created += 1;
            }
            Err(e) => warn!("Error creating student {}: {}", sample.code, e),
        }
    }

    info!("Student seeding completed ({} created)", created);
    Ok(created)
}
